//! OCR adapter: turns an uploaded image into use-case text.
//!
//! Always yields text. When no engine is installed, the engine fails, or its
//! output does not look like a use case, canned sample documents are served.

pub mod backend;
pub mod cleaner;
pub mod samples;
pub mod upload;

pub use backend::{OcrBackend, OcrMode, TesseractBackend};
pub use samples::{SampleBackend, SAMPLE_USE_CASES};
pub use upload::{UploadError, UploadStore};

use std::path::Path;
use tracing::{info, warn};

pub struct OcrProcessor {
    tesseract: Option<TesseractBackend>,
    samples: SampleBackend,
}

impl OcrProcessor {
    pub fn new(tesseract: Option<TesseractBackend>) -> Self {
        Self {
            tesseract,
            samples: SampleBackend::new(),
        }
    }

    /// Build a processor for the configured mode, probing for Tesseract when needed.
    pub async fn from_mode(mode: OcrMode, tesseract_cmd: &str) -> Self {
        let tesseract = match mode {
            OcrMode::Sample => {
                info!("Sample OCR mode selected, skipping engine probe");
                None
            }
            OcrMode::Auto | OcrMode::Tesseract => {
                let found = TesseractBackend::probe(tesseract_cmd).await;
                if found.is_none() && mode == OcrMode::Tesseract {
                    warn!(command = tesseract_cmd, "Tesseract mode requested but engine is missing");
                }
                found
            }
        };
        Self::new(tesseract)
    }

    pub fn sample_only() -> Self {
        Self::new(None)
    }

    pub fn is_tesseract_available(&self) -> bool {
        self.tesseract.as_ref().is_some_and(|t| t.is_available())
    }

    /// Extract text from an image. Never fails.
    pub async fn extract_text(&self, path: &Path) -> String {
        info!(path = %path.display(), "Processing image");

        let engine = self.tesseract.as_ref().filter(|t| t.is_available());
        let Some(engine) = engine else {
            info!("Using standalone OCR mode with sample data");
            return self.samples.extract(path).await;
        };

        match engine.recognize(path).await {
            Ok(raw) => {
                let text = clean_text(&raw);
                info!(backend = engine.name(), chars = text.chars().count(), "OCR extracted text");
                text
            }
            Err(e) => {
                warn!(backend = engine.name(), error = %e, "OCR engine failed, disabling it");
                engine.mark_unavailable();
                self.samples.extract(path).await
            }
        }
    }
}

/// Clean raw engine output, substituting a sample when it is not a use case.
pub fn clean_text(raw: &str) -> String {
    if raw.trim().is_empty() {
        return cleaner::NO_TEXT_NOTICE.to_string();
    }

    let cleaned = cleaner::normalize_lines(raw);
    if !cleaner::looks_like_use_case(&cleaned) {
        warn!("Extracted text doesn't appear to be a use case. Using sample data.");
        return samples::random_sample().to_string();
    }

    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_blank() {
        assert_eq!(clean_text("  \n\t "), cleaner::NO_TEXT_NOTICE);
    }

    #[test]
    fn test_clean_text_substitutes_sample() {
        let text = clean_text("receipt total 12.99");
        assert!(SAMPLE_USE_CASES.contains(&text.as_str()));
    }

    #[test]
    fn test_clean_text_keeps_use_case() {
        let raw = "  Use Case: Book Room \n\nActors: Guest\nGoal: Reserve a hotel room online\n";
        assert_eq!(
            clean_text(raw),
            "Use Case: Book Room\nActors: Guest\nGoal: Reserve a hotel room online"
        );
    }

    #[tokio::test]
    async fn test_sample_only_never_fails() {
        let ocr = OcrProcessor::sample_only();
        assert!(!ocr.is_tesseract_available());

        let text = ocr.extract_text(Path::new("does/not/exist.png")).await;
        assert!(!text.is_empty());
    }

    #[tokio::test]
    async fn test_failed_engine_is_disabled() {
        let ocr = OcrProcessor::new(Some(TesseractBackend::new("definitely-not-a-tesseract-binary")));
        assert!(ocr.is_tesseract_available());

        let text = ocr.extract_text(Path::new("does/not/exist.png")).await;
        assert!(SAMPLE_USE_CASES.contains(&text.as_str()));
        assert!(!ocr.is_tesseract_available());
    }
}
