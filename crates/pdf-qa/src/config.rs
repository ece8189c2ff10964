//! Configuration for the upload/query service

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Environment variable pointing at a TOML config file
pub const CONFIG_PATH_ENV: &str = "PDF_QA_CONFIG";

/// Config file picked up from the working directory when present
pub const DEFAULT_CONFIG_FILE: &str = "pdf-qa.toml";

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Document and text storage
    #[serde(default)]
    pub storage: StorageConfig,
    /// Completion service configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// Query configuration
    #[serde(default)]
    pub query: QueryConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum JSON body size in bytes (default: 5MB)
    pub max_json_body: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            enable_cors: true,
            max_json_body: 5 * 1024 * 1024,
        }
    }
}

/// How document identifiers are generated
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    /// Millisecond timestamp, strictly increasing within the process
    #[default]
    Timestamp,
    /// Random v4 UUID
    Uuid,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the raw uploaded document
    pub upload_dir: PathBuf,
    /// Directory holding the extracted text
    pub text_dir: PathBuf,
    /// Maximum upload size in bytes (default: 5MB)
    pub max_upload_size: usize,
    /// The single media type accepted for upload
    pub accepted_media_type: String,
    /// Identifier generation strategy
    pub id_strategy: IdStrategy,
    /// Upper bound on text extraction time in seconds
    pub extraction_timeout_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads"),
            text_dir: PathBuf::from("parsed"),
            max_upload_size: 5 * 1024 * 1024, // 5MB
            accepted_media_type: "application/pdf".to_string(),
            id_strategy: IdStrategy::Timestamp,
            extraction_timeout_secs: 60,
        }
    }
}

/// Completion service (OpenAI-compatible) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// API base URL
    pub base_url: String,
    /// API credential; normally supplied through OPENAI_API_KEY
    #[serde(skip_serializing)]
    pub api_key: String,
    /// Chat model name
    pub model: String,
    /// Sampling temperature (service default when unset)
    pub temperature: Option<f32>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            model: "gpt-3.5-turbo".to_string(),
            temperature: None,
            timeout_secs: 120,
        }
    }
}

/// Query configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Character ceiling for the excerpt sent to the model
    pub max_context_chars: usize,
    /// Instruction placed first in every prompt
    pub system_prompt: String,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            max_context_chars: 12_000,
            system_prompt: "You are a helpful assistant that answers questions strictly based on \
                            the provided PDF content. Use only the information in the document \
                            excerpt. Do not add outside knowledge. If the answer is not in the \
                            excerpt, say that the document does not contain it."
                .to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration: defaults, then an optional TOML file, then environment overrides
    pub fn load() -> Result<Self> {
        let path = match std::env::var(CONFIG_PATH_ENV) {
            Ok(p) => Some(PathBuf::from(p)),
            Err(_) => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                default.exists().then_some(default)
            }
        };

        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Read configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid config: {}", e)))
    }

    /// Apply overrides from a variable lookup (the process environment in production)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("Invalid PORT: {}", port)))?;
        }
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(key) = lookup("OPENAI_API_KEY") {
            self.llm.api_key = key;
        }
        if let Some(model) = lookup("OPENAI_MODEL") {
            self.llm.model = model;
        }
        if let Some(url) = lookup("OPENAI_BASE_URL") {
            self.llm.base_url = url;
        }
        if let Some(dir) = lookup("UPLOAD_DIR") {
            self.storage.upload_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("PARSED_DIR") {
            self.storage.text_dir = PathBuf::from(dir);
        }
        Ok(())
    }

    /// Reject configurations the pipelines cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.storage.max_upload_size == 0 {
            return Err(Error::Config("storage.max_upload_size must be positive".into()));
        }
        if self.query.max_context_chars == 0 {
            return Err(Error::Config("query.max_context_chars must be positive".into()));
        }
        if self.storage.accepted_media_type.trim().is_empty() {
            return Err(Error::Config("storage.accepted_media_type is empty".into()));
        }
        if self.storage.upload_dir == self.storage.text_dir {
            return Err(Error::Config(
                "storage.upload_dir and storage.text_dir must differ".into(),
            ));
        }
        Ok(())
    }

    /// Socket address string for the server
    pub fn address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.storage.max_upload_size, 5_242_880);
        assert_eq!(config.query.max_context_chars, 12_000);
        assert_eq!(config.storage.accepted_media_type, "application/pdf");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [server]
            port = 8080

            [llm]
            model = "gpt-4o-mini"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.storage.text_dir, PathBuf::from("parsed"));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [("PORT", "4100"), ("OPENAI_API_KEY", "sk-test")]
            .into_iter()
            .collect();

        let mut config = AppConfig::default();
        config
            .apply_overrides(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.server.port, 4100);
        assert_eq!(config.llm.api_key, "sk-test");
    }

    #[test]
    fn test_invalid_port_rejected() {
        let mut config = AppConfig::default();
        let result = config.apply_overrides(|k| (k == "PORT").then(|| "eighty".to_string()));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_shared_directory() {
        let mut config = AppConfig::default();
        config.storage.text_dir = config.storage.upload_dir.clone();
        assert!(config.validate().is_err());
    }
}
