use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;
use thiserror::Error;

/// Default number of sentences kept in a summary.
pub const DEFAULT_SUMMARY_SENTENCES: usize = 3;
/// Default number of keywords returned per document.
pub const DEFAULT_MAX_KEYWORDS: usize = 5;
/// Trimmed character count below which a PDF is treated as scanned.
pub const DEFAULT_OCR_MIN_TEXT_CHARS: usize = 100;
/// Default multipart upload limit (25 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the docmeta server and CLI.
#[derive(Debug, Clone)]
pub struct Config {
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
    /// Number of sentences retained by the summary extractor.
    pub summary_sentences: usize,
    /// Maximum number of keywords returned per document.
    pub max_keywords: usize,
    /// Trimmed text-layer length below which PDFs are sent through OCR.
    pub ocr_min_text_chars: usize,
    /// Tesseract language code(s), e.g. `eng` or `eng+deu`.
    pub ocr_language: String,
    /// Rasterization resolution used when rendering PDF pages for OCR.
    pub ocr_dpi: u32,
    /// Path or name of the `tesseract` binary.
    pub tesseract_cmd: PathBuf,
    /// Path or name of the `pdftoppm` binary.
    pub pdftoppm_cmd: PathBuf,
    /// Entity-recognition backend.
    pub ner_provider: NerProvider,
    /// Model used by the Ollama entity recognizer.
    pub ner_model: String,
    /// Base URL of the Ollama runtime.
    pub ollama_url: String,
    /// Maximum accepted upload size in bytes.
    pub max_upload_bytes: usize,
}

/// Supported entity-recognition backends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NerProvider {
    /// In-process rule-based recognizer.
    #[default]
    Heuristic,
    /// Local Ollama runtime prompted for entity spans.
    Ollama,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: None,
            summary_sentences: DEFAULT_SUMMARY_SENTENCES,
            max_keywords: DEFAULT_MAX_KEYWORDS,
            ocr_min_text_chars: DEFAULT_OCR_MIN_TEXT_CHARS,
            ocr_language: "eng".into(),
            ocr_dpi: 200,
            tesseract_cmd: PathBuf::from("tesseract"),
            pdftoppm_cmd: PathBuf::from("pdftoppm"),
            ner_provider: NerProvider::Heuristic,
            ner_model: "llama3.2".into(),
            ollama_url: DEFAULT_OLLAMA_URL.into(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            server_port: parse_optional("SERVER_PORT")?,
            summary_sentences: parse_optional("SUMMARY_SENTENCES")?
                .unwrap_or(defaults.summary_sentences),
            max_keywords: parse_optional("MAX_KEYWORDS")?.unwrap_or(defaults.max_keywords),
            ocr_min_text_chars: parse_optional("OCR_MIN_TEXT_CHARS")?
                .unwrap_or(defaults.ocr_min_text_chars),
            ocr_language: load_env_optional("OCR_LANGUAGE").unwrap_or(defaults.ocr_language),
            ocr_dpi: parse_optional("OCR_DPI")?
                .filter(|dpi| *dpi > 0)
                .unwrap_or(defaults.ocr_dpi),
            tesseract_cmd: load_env_optional("TESSERACT_CMD")
                .map(PathBuf::from)
                .unwrap_or(defaults.tesseract_cmd),
            pdftoppm_cmd: load_env_optional("PDFTOPPM_CMD")
                .map(PathBuf::from)
                .unwrap_or(defaults.pdftoppm_cmd),
            ner_provider: load_env_optional("NER_PROVIDER")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|()| ConfigError::InvalidValue("NER_PROVIDER".into()))
                })
                .transpose()?
                .unwrap_or_default(),
            ner_model: load_env_optional("NER_MODEL").unwrap_or(defaults.ner_model),
            ollama_url: load_env_optional("OLLAMA_URL").unwrap_or(defaults.ollama_url),
            max_upload_bytes: parse_optional("MAX_UPLOAD_BYTES")?
                .unwrap_or(defaults.max_upload_bytes),
        })
    }
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_optional<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    load_env_optional(key)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key.to_string()))
        })
        .transpose()
}

impl std::str::FromStr for NerProvider {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "heuristic" | "rules" => Ok(Self::Heuristic),
            "ollama" => Ok(Self::Ollama),
            _ => Err(()),
        }
    }
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load configuration from the environment and install it in the global cache.
pub fn init_config() -> Result<&'static Config, ConfigError> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    tracing::debug!(
        server_port = ?config.server_port,
        summary_sentences = config.summary_sentences,
        max_keywords = config.max_keywords,
        ocr_min_text_chars = config.ocr_min_text_chars,
        ner_provider = ?config.ner_provider,
        "Loaded configuration"
    );
    Ok(CONFIG.get_or_init(|| config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ner_provider_parses_known_values() {
        assert_eq!("ollama".parse::<NerProvider>(), Ok(NerProvider::Ollama));
        assert_eq!(" Heuristic ".parse::<NerProvider>(), Ok(NerProvider::Heuristic));
        assert!("transformers".parse::<NerProvider>().is_err());
    }

    #[test]
    fn defaults_match_pipeline_constants() {
        let config = Config::default();
        assert_eq!(config.summary_sentences, 3);
        assert_eq!(config.max_keywords, 5);
        assert_eq!(config.ocr_min_text_chars, 100);
        assert_eq!(config.ner_provider, NerProvider::Heuristic);
    }
}
