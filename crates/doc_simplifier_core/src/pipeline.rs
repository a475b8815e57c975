//! crates/doc_simplifier_core/src/pipeline.rs
//!
//! The end-to-end flow for one "process document" action:
//! intake, extraction, then the summary and key-points calls in sequence.

use std::sync::Arc;
use tracing::{error, info, warn};

use crate::dispatch::AiDispatcher;
use crate::domain::{
    Credential, ExtractionLimits, ExtractionResult, OutputKind, UploadPolicy, UploadedDocument,
};
use crate::error::{MissingInput, PipelineError};
use crate::extraction::extract_text;
use crate::intake::validate_upload;
use crate::ports::DocumentDecoder;
use crate::session::SessionSnapshot;

pub struct DocumentPipeline {
    decoder: Arc<dyn DocumentDecoder>,
    dispatcher: AiDispatcher,
    limits: ExtractionLimits,
    upload_policy: UploadPolicy,
}

impl DocumentPipeline {
    pub fn new(
        decoder: Arc<dyn DocumentDecoder>,
        dispatcher: AiDispatcher,
        limits: ExtractionLimits,
        upload_policy: UploadPolicy,
    ) -> Self {
        Self {
            decoder,
            dispatcher,
            limits,
            upload_policy,
        }
    }

    pub fn limits(&self) -> &ExtractionLimits {
        &self.limits
    }

    pub fn upload_policy(&self) -> &UploadPolicy {
        &self.upload_policy
    }

    /// How long a generated result stays memoized.
    pub fn cache_ttl(&self) -> std::time::Duration {
        self.dispatcher.cache().ttl()
    }

    /// Validates and decodes an upload on a blocking thread.
    pub async fn extract(&self, upload: &UploadedDocument) -> Result<ExtractionResult, PipelineError> {
        validate_upload(upload, &self.upload_policy)?;

        let decoder = self.decoder.clone();
        let bytes = upload.bytes.clone();
        let limits = self.limits.clone();
        let extraction = tokio::task::spawn_blocking(move || {
            extract_text(decoder.as_ref(), &bytes, &limits)
        })
        .await
        .map_err(|e| PipelineError::Internal(format!("extraction task failed: {}", e)))??;

        Ok(extraction)
    }

    /// Runs the whole flow and returns the snapshot that replaces the session's state.
    ///
    /// Any error here means nothing was produced and the caller keeps its
    /// previous snapshot. Generative failures do not error: they are recorded
    /// on the affected output and the other output is still attempted.
    pub async fn process(
        &self,
        upload: Option<UploadedDocument>,
        credential: Option<Credential>,
    ) -> Result<SessionSnapshot, PipelineError> {
        let upload = upload.ok_or(PipelineError::MissingInput(MissingInput::Document))?;
        let credential = credential.ok_or(PipelineError::MissingInput(MissingInput::Credential))?;

        let snapshot = SessionSnapshot::uploaded(upload.info());
        info!(
            "Processing '{}' ({} bytes)",
            upload.filename,
            upload.size()
        );

        let extraction = self.extract(&upload).await.map_err(|e| {
            error!("Extraction failed for '{}': {}", upload.filename, e);
            e
        })?;
        for advisory in &extraction.advisories {
            warn!("{}", advisory);
        }
        let text = extraction.text.clone();
        let snapshot = snapshot.extracted(extraction);

        let summary = self
            .dispatcher
            .run(OutputKind::Summary, &text, &credential)
            .await;
        let snapshot = snapshot.with_summary(summary);

        let key_points = self
            .dispatcher
            .run(OutputKind::KeyPoints, &text, &credential)
            .await;
        let snapshot = snapshot.with_key_points(key_points).displayed();

        info!(
            "Finished '{}': complete = {}",
            upload.filename,
            snapshot.is_complete()
        );
        Ok(snapshot)
    }

    /// Drops every memoized generative result.
    pub fn reset(&self) {
        self.dispatcher.cache().clear();
        info!("Result cache cleared");
    }
}
