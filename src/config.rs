use anyhow::Result;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

/// Placeholder key shipped in sample `.env` files; treated as "not configured".
const PLACEHOLDER_API_KEY: &str = "your-mistral-api-key-here";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LLMConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub cors_allowed_origins: Vec<String>,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LLMConfig {
    pub provider: String,
    pub api_key: String,
    pub model: String,
    pub api_base: Option<String>,
    pub max_retries: u32,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub projects_dir: PathBuf,
    pub logs_dir: PathBuf,
}

impl LLMConfig {
    /// The configured API key, or `None` when it is missing or still the placeholder.
    pub fn active_api_key(&self) -> Option<String> {
        let key = self.api_key.trim();
        if key.is_empty() || key == PLACEHOLDER_API_KEY {
            None
        } else {
            Some(key.to_string())
        }
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: "mistral".to_string(),
            api_key: String::new(),
            model: "mistral-large-latest".to_string(),
            api_base: None,
            max_retries: 2,
            timeout_secs: 60,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .unwrap_or_else(|_| "8000".to_string())
                    .parse()?,
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                cors_allowed_origins: env::var("ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| "*".to_string())
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                    .unwrap_or_else(|_| (25 * 1024 * 1024).to_string())
                    .parse()?,
            },
            llm: LLMConfig {
                provider: env::var("LLM_PROVIDER").unwrap_or_else(|_| "mistral".to_string()),
                api_key: env::var("LLM_API_KEY")
                    .or_else(|_| env::var("MISTRAL_API_KEY"))
                    .unwrap_or_default(),
                model: env::var("LLM_MODEL")
                    .unwrap_or_else(|_| "mistral-large-latest".to_string()),
                api_base: env::var("LLM_API_BASE").ok().filter(|s| !s.is_empty()),
                max_retries: env::var("LLM_MAX_RETRIES")
                    .unwrap_or_else(|_| "2".to_string())
                    .parse()?,
                timeout_secs: env::var("LLM_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "60".to_string())
                    .parse()?,
            },
            storage: StorageConfig {
                projects_dir: env::var("PROJECTS_DIR")
                    .unwrap_or_else(|_| "projects".to_string())
                    .into(),
                logs_dir: env::var("LOGS_DIR")
                    .unwrap_or_else(|_| "logs".to_string())
                    .into(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_api_key_ignores_placeholder() {
        let mut llm = LLMConfig::default();
        assert_eq!(llm.active_api_key(), None);

        llm.api_key = PLACEHOLDER_API_KEY.to_string();
        assert_eq!(llm.active_api_key(), None);

        llm.api_key = "  sk-live-123 ".to_string();
        assert_eq!(llm.active_api_key(), Some("sk-live-123".to_string()));
    }
}
