use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::info;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("No file part")]
    MissingFile,

    #[error("No selected file")]
    EmptyFilename,

    #[error("Invalid file type. Allowed: {allowed}")]
    UnsupportedExtension { allowed: String },

    #[error("File too large: {size} bytes (limit {limit} bytes)")]
    TooLarge { size: usize, limit: usize },

    #[error("Failed to store upload: {0}")]
    Io(#[from] std::io::Error),
}

/// Validates uploads and writes them under a single directory.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    allowed_extensions: Vec<String>,
    max_file_size: usize,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>, allowed_extensions: Vec<String>, max_file_size: usize) -> Self {
        Self {
            dir: dir.into(),
            allowed_extensions: allowed_extensions
                .into_iter()
                .map(|e| e.to_lowercase())
                .collect(),
            max_file_size,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    /// Check the extension, i.e. whatever follows the last dot
    pub fn is_allowed(&self, filename: &str) -> bool {
        match filename.rsplit_once('.') {
            Some((_, ext)) => self.allowed_extensions.contains(&ext.to_lowercase()),
            None => false,
        }
    }

    /// Validate and persist an upload, returning the stored path.
    pub async fn store(&self, filename: &str, data: &[u8]) -> Result<PathBuf, UploadError> {
        if filename.is_empty() {
            return Err(UploadError::EmptyFilename);
        }
        if !self.is_allowed(filename) {
            return Err(UploadError::UnsupportedExtension {
                allowed: self.allowed_extensions.join(", "),
            });
        }
        if data.len() > self.max_file_size {
            return Err(UploadError::TooLarge {
                size: data.len(),
                limit: self.max_file_size,
            });
        }

        let safe_name = secure_filename(filename);
        if safe_name.is_empty() {
            return Err(UploadError::EmptyFilename);
        }

        fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(&safe_name);
        fs::write(&path, data).await?;

        info!(path = %path.display(), bytes = data.len(), "Stored upload");
        Ok(path)
    }
}

/// Reduce a client-supplied filename to a safe single path component.
pub fn secure_filename(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let cleaned: String = base
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    cleaned.trim_start_matches(['.', '_']).to_string()
}
