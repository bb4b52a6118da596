use crate::llm::openai_compat::OpenAICompatAdapter;
use crate::llm::provider::LLMAdapter;
use crate::types::{AppResult, LLMRequest, LLMResponse};
use async_trait::async_trait;
use std::time::Duration;

pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

pub struct OpenAIAdapter {
    inner: OpenAICompatAdapter,
}

impl OpenAIAdapter {
    pub fn new(api_key: &str, api_base: Option<&str>, timeout: Duration) -> AppResult<Self> {
        Ok(Self {
            inner: OpenAICompatAdapter::new(
                "OpenAI",
                api_key,
                api_base.unwrap_or(OPENAI_API_BASE),
                timeout,
            )?,
        })
    }
}

#[async_trait]
impl LLMAdapter for OpenAIAdapter {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        self.inner.create_chat_completion(request).await
    }
}
