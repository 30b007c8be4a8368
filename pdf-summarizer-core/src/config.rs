//! Configuration management
//!
//! Configuration is resolved once at startup and handed to the components
//! that need it. Nothing reads the environment after that.

use std::env;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 5006;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub model: ModelConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Created at startup; uploads are only ever held in memory
    pub upload_dir: PathBuf,
    pub generated_dir: PathBuf,
}

#[derive(Clone)]
pub struct ModelConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl std::fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ModelConfig {
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: DEFAULT_PORT,
                max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            },
            storage: StorageConfig {
                upload_dir: PathBuf::from("uploads"),
                generated_dir: PathBuf::from("generated_pdfs"),
            },
            model: ModelConfig {
                api_key: None,
                model: DEFAULT_MODEL.to_string(),
                base_url: DEFAULT_BASE_URL.to_string(),
            },
        }
    }
}

impl Config {
    /// Load `.env` (if present) and read the process environment
    pub fn from_env() -> Self {
        if let Err(e) = dotenvy::dotenv() {
            tracing::debug!("No .env file loaded: {}", e);
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Config {
            server: ServerConfig {
                host: non_blank("SERVER_HOST").unwrap_or(defaults.server.host),
                port: non_blank("SERVER_PORT")
                    .and_then(|v| v.trim().parse().ok())
                    .unwrap_or(defaults.server.port),
                max_upload_bytes: non_blank("MAX_UPLOAD_BYTES")
                    .and_then(|v| v.trim().parse().ok())
                    .unwrap_or(defaults.server.max_upload_bytes),
            },
            storage: StorageConfig {
                upload_dir: non_blank("UPLOAD_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.storage.upload_dir),
                generated_dir: non_blank("GENERATED_PDF_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.storage.generated_dir),
            },
            model: ModelConfig {
                api_key: non_blank("GOOGLE_API_KEY").map(|k| k.trim().to_string()),
                model: non_blank("SUMMARIZER_MODEL").unwrap_or(defaults.model.model),
                base_url: non_blank("GEMINI_BASE_URL")
                    .map(|u| u.trim_end_matches('/').to_string())
                    .unwrap_or(defaults.model.base_url),
            },
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_environment_empty() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config.server.port, 5006);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.storage.generated_dir, PathBuf::from("generated_pdfs"));
        assert_eq!(config.storage.upload_dir, PathBuf::from("uploads"));
        assert_eq!(config.model.model, DEFAULT_MODEL);
        assert!(!config.model.is_configured());
    }

    #[test]
    fn test_values_from_environment() {
        let config = Config::from_lookup(lookup_from(&[
            ("SERVER_PORT", "8080"),
            ("GOOGLE_API_KEY", " secret "),
            ("GENERATED_PDF_DIR", "/tmp/out"),
            ("GEMINI_BASE_URL", "http://localhost:9000/"),
            ("MAX_UPLOAD_BYTES", "1024"),
        ]));
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.max_upload_bytes, 1024);
        assert_eq!(config.model.api_key.as_deref(), Some("secret"));
        assert_eq!(config.storage.generated_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.model.base_url, "http://localhost:9000");
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_blank_key_is_unconfigured() {
        let config = Config::from_lookup(lookup_from(&[("GOOGLE_API_KEY", "   ")]));
        assert!(!config.model.is_configured());
    }

    #[test]
    fn test_invalid_port_falls_back() {
        let config = Config::from_lookup(lookup_from(&[("SERVER_PORT", "not-a-port")]));
        assert_eq!(config.server.port, DEFAULT_PORT);
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = Config::from_lookup(lookup_from(&[("GOOGLE_API_KEY", "secret")]));
        let printed = format!("{:?}", config.model);
        assert!(!printed.contains("secret"));
        assert!(printed.contains("<redacted>"));
    }
}
