//! services/api/src/adapters/pdf.rs
//!
//! This module contains the PDF decoder adapter, the concrete implementation
//! of the `DocumentDecoder` port from the `core` crate, built on `lopdf`.

use doc_simplifier_core::ports::{DecodeError, DecodedDocument, DocumentDecoder};
use lopdf::Document;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A decoder that implements the `DocumentDecoder` port using `lopdf`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LopdfDecoder;

impl LopdfDecoder {
    pub fn new() -> Self {
        Self
    }
}

/// A parsed PDF. The whole object graph lives here and is freed on drop.
struct LopdfDocument {
    document: Document,
    /// 1-based page numbers in document order.
    page_numbers: Vec<u32>,
}

//=========================================================================================
// `DocumentDecoder` Trait Implementation
//=========================================================================================

impl DocumentDecoder for LopdfDecoder {
    fn open(&self, bytes: &[u8]) -> Result<Box<dyn DecodedDocument>, DecodeError> {
        let document = Document::load_mem(bytes).map_err(|e| DecodeError(e.to_string()))?;
        if document.trailer.get(b"Root").is_err() {
            return Err(DecodeError("PDF has no document catalog".to_string()));
        }

        // `get_pages` is keyed by page number, so the keys are already in order.
        let page_numbers = document.get_pages().keys().copied().collect();
        Ok(Box::new(LopdfDocument {
            document,
            page_numbers,
        }))
    }
}

impl DecodedDocument for LopdfDocument {
    fn page_count(&self) -> usize {
        self.page_numbers.len()
    }

    fn page_text(&self, index: usize) -> Result<String, DecodeError> {
        let page_number = self
            .page_numbers
            .get(index)
            .copied()
            .ok_or_else(|| DecodeError(format!("page index {} out of range", index)))?;

        self.document
            .extract_text(&[page_number])
            .map_err(|e| DecodeError(e.to_string()))
    }
}
