//! crates/doc_simplifier_core/src/extraction.rs
//!
//! Turns document bytes into bounded text, or a structured reason why not.

use tracing::{debug, warn};

use crate::domain::{Advisory, ExtractionLimits, ExtractionResult};
use crate::error::ExtractionError;
use crate::ports::DocumentDecoder;

/// Reads at most `limits.max_pages` pages and concatenates their text.
///
/// A page that fails to decode is skipped with an advisory. The decoded
/// document is owned by this function and dropped on every return path.
pub fn extract_text(
    decoder: &dyn DocumentDecoder,
    bytes: &[u8],
    limits: &ExtractionLimits,
) -> Result<ExtractionResult, ExtractionError> {
    if bytes.is_empty() {
        return Err(ExtractionError::CorruptInput("file is empty".to_string()));
    }

    let document = decoder
        .open(bytes)
        .map_err(|e| ExtractionError::CorruptInput(e.to_string()))?;

    let total_pages = document.page_count();
    let pages_processed = total_pages.min(limits.max_pages);
    let mut advisories = Vec::new();

    if total_pages > limits.max_pages {
        warn!(
            "Document has {} pages, only the first {} will be processed",
            total_pages, pages_processed
        );
        advisories.push(Advisory::PagesTruncated {
            total: total_pages,
            processed: pages_processed,
        });
    }

    let mut text = String::new();
    for index in 0..pages_processed {
        match document.page_text(index) {
            Ok(page) => {
                text.push_str(&page);
                text.push('\n');
            }
            Err(e) => {
                warn!("Skipping page {}: {}", index + 1, e);
                advisories.push(Advisory::PageSkipped {
                    page: index + 1,
                    reason: e.to_string(),
                });
            }
        }
    }
    drop(document);

    if text.trim().is_empty() {
        return Err(ExtractionError::NoExtractableText);
    }

    let chars = text.chars().count();
    if chars > limits.max_text_chars {
        return Err(ExtractionError::TextTooLarge {
            chars,
            limit: limits.max_text_chars,
        });
    }

    debug!("Extracted {} characters from {} pages", chars, pages_processed);
    Ok(ExtractionResult {
        text,
        total_pages,
        pages_processed,
        advisories,
    })
}

#[cfg(test)]
pub(crate) mod fakes {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use crate::ports::{DecodeError, DecodedDocument, DocumentDecoder};

    /// Page contents for a fake document; `Err` marks a page that fails to decode.
    #[derive(Clone, Default)]
    pub struct FakeDecoder {
        pub pages: Vec<Result<String, String>>,
        pub corrupt: bool,
        pub opened: Arc<AtomicUsize>,
        pub released: Arc<AtomicUsize>,
        pub pages_read: Arc<AtomicUsize>,
    }

    impl FakeDecoder {
        pub fn with_pages<S: Into<String>>(pages: impl IntoIterator<Item = S>) -> Self {
            Self {
                pages: pages.into_iter().map(|p| Ok(p.into())).collect(),
                ..Self::default()
            }
        }

        pub fn corrupt() -> Self {
            Self {
                corrupt: true,
                ..Self::default()
            }
        }
    }

    struct FakeDocument {
        pages: Vec<Result<String, String>>,
        released: Arc<AtomicUsize>,
        pages_read: Arc<AtomicUsize>,
    }

    impl DocumentDecoder for FakeDecoder {
        fn open(&self, _bytes: &[u8]) -> Result<Box<dyn DecodedDocument>, DecodeError> {
            if self.corrupt {
                return Err(DecodeError("invalid file header".to_string()));
            }
            self.opened.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(FakeDocument {
                pages: self.pages.clone(),
                released: self.released.clone(),
                pages_read: self.pages_read.clone(),
            }))
        }
    }

    impl DecodedDocument for FakeDocument {
        fn page_count(&self) -> usize {
            self.pages.len()
        }

        fn page_text(&self, index: usize) -> Result<String, DecodeError> {
            self.pages_read.fetch_add(1, Ordering::SeqCst);
            self.pages[index].clone().map_err(DecodeError)
        }
    }

    impl Drop for FakeDocument {
        fn drop(&mut self) {
            self.released.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::fakes::FakeDecoder;
    use super::*;

    const BYTES: &[u8] = b"%PDF-1.5 fake";

    fn limits(max_pages: usize, max_text_chars: usize) -> ExtractionLimits {
        ExtractionLimits {
            max_pages,
            max_text_chars,
        }
    }

    #[test]
    fn concatenates_every_page_when_under_the_ceiling() {
        let decoder = FakeDecoder::with_pages(["first page", "second page"]);
        let result = extract_text(&decoder, BYTES, &ExtractionLimits::default()).unwrap();

        assert_eq!(result.text, "first page\nsecond page\n");
        assert_eq!(result.total_pages, 2);
        assert_eq!(result.pages_processed, 2);
        assert!(result.advisories.is_empty());
    }

    #[test]
    fn pages_beyond_the_ceiling_are_never_read() {
        let pages: Vec<String> = (1..=5).map(|n| format!("page-{}", n)).collect();
        let decoder = FakeDecoder::with_pages(pages);
        let result = extract_text(&decoder, BYTES, &limits(3, 1_000)).unwrap();

        assert_eq!(result.total_pages, 5);
        assert_eq!(result.pages_processed, 3);
        assert!(result.text.contains("page-3"));
        assert!(!result.text.contains("page-4"));
        assert!(!result.text.contains("page-5"));
        assert_eq!(decoder.pages_read.load(Ordering::SeqCst), 3);
        assert_eq!(
            result.advisories,
            vec![Advisory::PagesTruncated {
                total: 5,
                processed: 3
            }]
        );
    }

    #[test]
    fn failing_pages_are_skipped_with_an_advisory() {
        let mut decoder = FakeDecoder::with_pages(["one", "", "three"]);
        decoder.pages[1] = Err("bad content stream".to_string());

        let result = extract_text(&decoder, BYTES, &ExtractionLimits::default()).unwrap();
        assert_eq!(result.text, "one\nthree\n");
        assert_eq!(result.pages_processed, 3);
        assert_eq!(
            result.advisories,
            vec![Advisory::PageSkipped {
                page: 2,
                reason: "bad content stream".to_string()
            }]
        );
    }

    #[test]
    fn whitespace_only_text_is_not_extractable() {
        let decoder = FakeDecoder::with_pages(["   ", "\n\t"]);
        assert_eq!(
            extract_text(&decoder, BYTES, &ExtractionLimits::default()),
            Err(ExtractionError::NoExtractableText)
        );
    }

    #[test]
    fn all_pages_failing_is_not_extractable() {
        let mut decoder = FakeDecoder::with_pages(["", ""]);
        decoder.pages = vec![Err("x".into()), Err("y".into())];
        assert_eq!(
            extract_text(&decoder, BYTES, &ExtractionLimits::default()),
            Err(ExtractionError::NoExtractableText)
        );
    }

    #[test]
    fn oversized_text_is_rejected() {
        let decoder = FakeDecoder::with_pages(["abcdefghij"]);
        // 10 characters plus the page separator.
        assert_eq!(
            extract_text(&decoder, BYTES, &limits(10, 10)),
            Err(ExtractionError::TextTooLarge {
                chars: 11,
                limit: 10
            })
        );
        assert!(extract_text(&decoder, BYTES, &limits(10, 11)).is_ok());
    }

    #[test]
    fn character_ceiling_counts_characters_not_bytes() {
        let decoder = FakeDecoder::with_pages(["ééééé"]);
        assert!(extract_text(&decoder, BYTES, &limits(10, 6)).is_ok());
    }

    #[test]
    fn structural_failures_are_corrupt_input() {
        let decoder = FakeDecoder::corrupt();
        assert!(matches!(
            extract_text(&decoder, BYTES, &ExtractionLimits::default()),
            Err(ExtractionError::CorruptInput(_))
        ));
    }

    #[test]
    fn empty_bytes_are_corrupt_without_opening() {
        let decoder = FakeDecoder::with_pages(["never read"]);
        assert!(matches!(
            extract_text(&decoder, &[], &ExtractionLimits::default()),
            Err(ExtractionError::CorruptInput(_))
        ));
        assert_eq!(decoder.opened.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn document_is_released_on_success_and_failure() {
        let ok = FakeDecoder::with_pages(["text"]);
        extract_text(&ok, BYTES, &ExtractionLimits::default()).unwrap();
        assert_eq!(ok.released.load(Ordering::SeqCst), 1);

        let empty = FakeDecoder::with_pages([" "]);
        extract_text(&empty, BYTES, &ExtractionLimits::default()).unwrap_err();
        assert_eq!(empty.released.load(Ordering::SeqCst), 1);

        let mut skipped = FakeDecoder::with_pages(["a", "b"]);
        skipped.pages[0] = Err("boom".into());
        extract_text(&skipped, BYTES, &ExtractionLimits::default()).unwrap();
        assert_eq!(skipped.released.load(Ordering::SeqCst), 1);
    }
}
