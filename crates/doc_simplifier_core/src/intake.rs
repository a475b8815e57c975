//! crates/doc_simplifier_core/src/intake.rs
//!
//! Upload checks that run before the decoder ever sees the bytes.

use std::path::Path;

use crate::domain::{UploadPolicy, UploadedDocument};
use crate::error::IntakeError;

/// Checks the declared file type and, when a limit is configured, the size.
///
/// An empty file is let through on purpose: it fails later as corrupt input.
pub fn validate_upload(upload: &UploadedDocument, policy: &UploadPolicy) -> Result<(), IntakeError> {
    let extension = Path::new(&upload.filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let allowed = extension
        .as_deref()
        .is_some_and(|ext| policy.allowed_extensions.iter().any(|a| a == ext));
    if !allowed {
        return Err(IntakeError::UnsupportedFileType {
            filename: upload.filename.clone(),
        });
    }

    if let Some(limit) = policy.max_bytes {
        if upload.size() > limit {
            return Err(IntakeError::FileTooLarge {
                size: upload.size(),
                limit,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(max_bytes: Option<usize>) -> UploadPolicy {
        UploadPolicy {
            max_bytes,
            ..UploadPolicy::default()
        }
    }

    #[test]
    fn accepts_pdf_extension_in_any_case() {
        let upload = UploadedDocument::new("Report.PDF", vec![1, 2, 3]);
        assert!(validate_upload(&upload, &policy(None)).is_ok());
    }

    #[test]
    fn rejects_other_extensions() {
        for name in ["notes.txt", "archive.pdf.zip", "no_extension"] {
            let upload = UploadedDocument::new(name, vec![1]);
            assert!(matches!(
                validate_upload(&upload, &policy(None)),
                Err(IntakeError::UnsupportedFileType { .. })
            ));
        }
    }

    #[test]
    fn size_limit_only_applies_when_configured() {
        let upload = UploadedDocument::new("big.pdf", vec![0u8; 11]);
        assert_eq!(
            validate_upload(&upload, &policy(Some(10))),
            Err(IntakeError::FileTooLarge { size: 11, limit: 10 })
        );
        assert!(validate_upload(&upload, &policy(None)).is_ok());
        assert!(validate_upload(&upload, &policy(Some(11))).is_ok());
    }

    #[test]
    fn empty_pdf_passes_intake() {
        let upload = UploadedDocument::new("empty.pdf", Vec::new());
        assert!(validate_upload(&upload, &UploadPolicy::default()).is_ok());
    }
}
