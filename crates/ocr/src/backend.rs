use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::process::Command;
use tracing::{info, warn};

/// Something that turns an image on disk into raw text.
pub trait OcrBackend {
    fn name(&self) -> &'static str;

    fn recognize(&self, path: &Path) -> impl Future<Output = Result<String>> + Send;
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OcrMode {
    /// Probe for Tesseract once, fall back to samples when it is missing
    #[default]
    Auto,
    /// Expect Tesseract to be installed
    Tesseract,
    /// Never run an engine
    Sample,
}

/// Tesseract driven through its command-line executable.
pub struct TesseractBackend {
    command: String,
    available: AtomicBool,
}

impl TesseractBackend {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            available: AtomicBool::new(true),
        }
    }

    /// Returns the backend only if `<command> --version` runs successfully.
    pub async fn probe(command: &str) -> Option<Self> {
        match Command::new(command).arg("--version").output().await {
            Ok(output) if output.status.success() => {
                info!(command, "Tesseract found");
                Some(Self::new(command))
            }
            Ok(output) => {
                warn!(command, status = %output.status, "Tesseract probe failed. Using standalone OCR mode.");
                None
            }
            Err(e) => {
                warn!(command, error = %e, "Tesseract not available. Using standalone OCR mode.");
                None
            }
        }
    }

    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::Relaxed)
    }

    /// A failed recognition disables the engine for the rest of the process.
    pub fn mark_unavailable(&self) {
        self.available.store(false, Ordering::Relaxed);
    }
}

impl OcrBackend for TesseractBackend {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    async fn recognize(&self, path: &Path) -> Result<String> {
        let output = Command::new(&self.command)
            .arg(path)
            .arg("stdout")
            .args(["--oem", "3", "--psm", "6"])
            .output()
            .await
            .context(format!("Failed to run {}", self.command))?;

        if !output.status.success() {
            anyhow::bail!(
                "Tesseract exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
