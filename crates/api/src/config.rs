use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use ocr::OcrMode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub upload: UploadConfig,
    pub ocr: OcrConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    pub dir: String,
    pub max_file_size: usize,
    pub allowed_extensions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    pub mode: OcrMode,
    pub tesseract_cmd: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    /// "json" or anything else for plain text
    pub format: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
            },
            upload: UploadConfig {
                dir: "uploads".to_string(),
                max_file_size: 5 * 1024 * 1024,
                allowed_extensions: vec![
                    "png".to_string(),
                    "jpg".to_string(),
                    "jpeg".to_string(),
                    "pdf".to_string(),
                ],
            },
            ocr: OcrConfig {
                mode: OcrMode::Auto,
                tesseract_cmd: "tesseract".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "plain".to_string(),
            },
        }
    }
}

impl AppConfig {
    /// Defaults, then `.env`, then `REQGEN__SECTION__KEY` environment variables.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_environment(Environment::with_prefix("REQGEN"))
    }

    fn from_environment(env: Environment) -> Result<Self> {
        let defaults = serde_json::to_string(&Self::default()).context("Failed to encode default config")?;

        Config::builder()
            .add_source(File::from_str(&defaults, FileFormat::Json))
            .add_source(
                env.separator("__")
                    .list_separator(",")
                    .with_list_parse_key("upload.allowed_extensions")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Preset that never touches an OCR engine
    pub fn sample_mode() -> Self {
        let mut config = Self::default();
        config.ocr.mode = OcrMode::Sample;
        config
    }
}
