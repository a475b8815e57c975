//! Shared fixtures for the integration tests: real PDFs built with `lopdf`
//! and a recording generator standing in for the AI provider.

#![allow(dead_code)]

use async_trait::async_trait;
use doc_simplifier_core::{
    GenerationRequest, ProviderFailure, ProviderReply, TextGenerationService,
};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use parking_lot::Mutex;
use std::collections::VecDeque;

//=========================================================================================
// PDF Fixtures
//=========================================================================================

/// Builds a PDF with one page per entry. An empty entry yields a page with no text,
/// the same as a scanned image page.
pub fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids = Vec::with_capacity(pages.len());
    for text in pages {
        let mut operations = Vec::new();
        if !text.is_empty() {
            operations = vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ];
        }
        let content = Content { operations };
        let encoded = content.encode().expect("content encodes");
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("pdf serializes");
    bytes
}

/// `count` pages, each reading "Page N".
pub fn numbered_pdf(count: usize) -> Vec<u8> {
    let labels: Vec<String> = (1..=count).map(|n| format!("Page {}", n)).collect();
    let refs: Vec<&str> = labels.iter().map(String::as_str).collect();
    pdf_with_pages(&refs)
}

//=========================================================================================
// Recording Generator
//=========================================================================================

/// Replays scripted replies in order, then answers "generated text".
/// Records every prompt and the key each call was made with.
#[derive(Default)]
pub struct RecordingGenerator {
    replies: Mutex<VecDeque<Result<ProviderReply, ProviderFailure>>>,
    pub prompts: Mutex<Vec<String>>,
    pub keys: Mutex<Vec<String>>,
}

impl RecordingGenerator {
    pub fn new(replies: impl IntoIterator<Item = Result<ProviderReply, ProviderFailure>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().len()
    }
}

#[async_trait]
impl TextGenerationService for RecordingGenerator {
    async fn generate(
        &self,
        request: GenerationRequest<'_>,
    ) -> Result<ProviderReply, ProviderFailure> {
        self.prompts.lock().push(request.prompt.to_string());
        self.keys.lock().push(request.credential.expose().to_string());
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(ProviderReply::text("generated text")))
    }
}
