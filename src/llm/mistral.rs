use crate::llm::openai_compat::OpenAICompatAdapter;
use crate::llm::provider::LLMAdapter;
use crate::types::{AppResult, LLMRequest, LLMResponse};
use async_trait::async_trait;
use std::time::Duration;

pub const MISTRAL_API_BASE: &str = "https://api.mistral.ai/v1";

pub struct MistralAdapter {
    inner: OpenAICompatAdapter,
}

impl MistralAdapter {
    pub fn new(api_key: &str, api_base: Option<&str>, timeout: Duration) -> AppResult<Self> {
        Ok(Self {
            inner: OpenAICompatAdapter::new(
                "Mistral",
                api_key,
                api_base.unwrap_or(MISTRAL_API_BASE),
                timeout,
            )?,
        })
    }
}

#[async_trait]
impl LLMAdapter for MistralAdapter {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        self.inner.create_chat_completion(request).await
    }
}
