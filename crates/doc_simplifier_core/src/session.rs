//! crates/doc_simplifier_core/src/session.rs
//!
//! The presentation state of one user session, as an immutable snapshot.
//! Each pipeline step consumes the previous snapshot and returns the next one.

use chrono::{DateTime, Utc};

use crate::domain::{AiResult, DocumentInfo, ExtractionResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Uploaded,
    Extracted,
    Summarized,
    PointsExtracted,
    Displayed,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Idle => "idle",
            Stage::Uploaded => "uploaded",
            Stage::Extracted => "extracted",
            Stage::Summarized => "summarized",
            Stage::PointsExtracted => "points_extracted",
            Stage::Displayed => "displayed",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub stage: Stage,
    pub document: Option<DocumentInfo>,
    pub extraction: Option<ExtractionResult>,
    pub summary: Option<AiResult>,
    pub key_points: Option<AiResult>,
    pub updated_at: DateTime<Utc>,
}

impl SessionSnapshot {
    pub fn idle() -> Self {
        Self {
            stage: Stage::Idle,
            document: None,
            extraction: None,
            summary: None,
            key_points: None,
            updated_at: Utc::now(),
        }
    }

    /// Starts a fresh snapshot for a new document; nothing from before is carried over.
    pub fn uploaded(document: DocumentInfo) -> Self {
        Self {
            stage: Stage::Uploaded,
            document: Some(document),
            ..Self::idle()
        }
    }

    pub fn extracted(self, extraction: ExtractionResult) -> Self {
        Self {
            stage: Stage::Extracted,
            extraction: Some(extraction),
            updated_at: Utc::now(),
            ..self
        }
    }

    pub fn with_summary(self, summary: AiResult) -> Self {
        Self {
            stage: Stage::Summarized,
            summary: Some(summary),
            updated_at: Utc::now(),
            ..self
        }
    }

    pub fn with_key_points(self, key_points: AiResult) -> Self {
        Self {
            stage: Stage::PointsExtracted,
            key_points: Some(key_points),
            updated_at: Utc::now(),
            ..self
        }
    }

    pub fn displayed(self) -> Self {
        Self {
            stage: Stage::Displayed,
            updated_at: Utc::now(),
            ..self
        }
    }

    /// True once both generative outputs succeeded.
    pub fn is_complete(&self) -> bool {
        let ok = |r: &Option<AiResult>| r.as_ref().is_some_and(AiResult::is_success);
        ok(&self.summary) && ok(&self.key_points)
    }

    /// The one-line status shown after extraction, e.g. "Extracted 1,234 characters from 2 pages".
    pub fn status_message(&self) -> Option<String> {
        self.extraction.as_ref().map(|extraction| {
            format!(
                "Extracted {} characters from {} pages",
                group_thousands(extraction.char_count()),
                extraction.pages_processed
            )
        })
    }
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self::idle()
    }
}

fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
