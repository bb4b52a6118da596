use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::LLMConfig;
use crate::types::{AppError, AppResult, LLMMessage, LLMRequest, LLMResponse};
use crate::utils::with_retry;

#[async_trait]
pub trait LLMAdapter: Send + Sync {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse>;
}

const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// The model handle shared through `AppState`. Holds no adapter when no
/// usable API key is configured; callers check [`LLM::is_available`] and
/// fall back to deterministic behaviour.
pub struct LLM {
    adapter: Option<Box<dyn LLMAdapter>>,
    provider_name: String,
    model: String,
    max_retries: u32,
    retry_delay: Duration,
}

impl LLM {
    pub fn from_config(config: &LLMConfig) -> AppResult<Self> {
        let Some(api_key) = config.active_api_key() else {
            warn!(provider = %config.provider, "No LLM API key configured, AI features disabled");
            return Ok(Self::disabled());
        };

        let timeout = Duration::from_secs(config.timeout_secs);
        let api_base = config.api_base.as_deref();
        let adapter: Box<dyn LLMAdapter> = match config.provider.to_lowercase().as_str() {
            "mistral" => Box::new(crate::llm::mistral::MistralAdapter::new(&api_key, api_base, timeout)?),
            "openai" => Box::new(crate::llm::openai::OpenAIAdapter::new(&api_key, api_base, timeout)?),
            other => {
                return Err(AppError::Internal(format!("Unsupported LLM provider: {}", other)));
            }
        };

        info!(provider = %config.provider, model = %config.model, "LLM client initialized");
        Ok(Self {
            adapter: Some(adapter),
            provider_name: config.provider.clone(),
            model: config.model.clone(),
            max_retries: config.max_retries,
            retry_delay: DEFAULT_RETRY_DELAY,
        })
    }

    pub fn disabled() -> Self {
        Self {
            adapter: None,
            provider_name: "none".to_string(),
            model: String::new(),
            max_retries: 0,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    pub fn with_adapter(adapter: Box<dyn LLMAdapter>, provider_name: &str, model: &str) -> Self {
        Self {
            adapter: Some(adapter),
            provider_name: provider_name.to_string(),
            model: model.to_string(),
            max_retries: 0,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    pub fn with_retries(mut self, max_retries: u32, retry_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_delay = retry_delay;
        self
    }

    pub fn is_available(&self) -> bool {
        self.adapter.is_some()
    }

    pub fn provider_name(&self) -> &str {
        &self.provider_name
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// A request addressed to the configured provider and model.
    pub fn request(
        &self,
        messages: Vec<LLMMessage>,
        max_tokens: u32,
        temperature: f32,
        json_mode: bool,
    ) -> LLMRequest {
        LLMRequest {
            provider: self.provider_name.clone(),
            model: self.model.clone(),
            messages,
            max_tokens: Some(max_tokens),
            temperature: Some(temperature),
            json_mode,
        }
    }

    pub async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        let adapter = self
            .adapter
            .as_ref()
            .ok_or_else(|| AppError::LLMApi("LLM client not configured".to_string()))?;

        with_retry(
            move || adapter.create_chat_completion(request),
            self.max_retries,
            self.retry_delay,
        )
        .await
    }
}
