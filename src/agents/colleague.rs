//! Document Colleague
//!
//! Conversational answers to questions about the document being edited.

use tracing::{info, warn};

use crate::llm::LLM;
use crate::models::ChatResponse;
use crate::types::LLMMessage;

const MAX_TOKENS: u32 = 2048;
const TEMPERATURE: f32 = 0.7;

const SYSTEM_PROMPT: &str = "You are an experienced legal colleague and document specialist working alongside the user. \
You understand legal documents, their business context and their strategic implications.

When answering:
1. Show that you understand the document's type and purpose.
2. Answer the specific question directly.
3. Point out implications, risks or opportunities the question touches on.
4. Suggest improvements or alternatives where they help.
5. Recommend next steps when relevant.

Be conversational but professional, and refer to specific parts of the document.";

pub struct DocumentColleague;

impl DocumentColleague {
    pub async fn answer(text: &str, question: &str, llm: &LLM) -> ChatResponse {
        if !llm.is_available() {
            return ChatResponse {
                response: "AI chat is currently unavailable. Please try again later.".to_string(),
                success: false,
                error: Some("LLM client not configured".to_string()),
            };
        }

        let request = llm.request(
            vec![
                LLMMessage::system(SYSTEM_PROMPT),
                LLMMessage::user(format!(
                    "Based on this legal document:\n\n{}\n\nPlease answer this question: {}\n\n\
                     Provide a helpful, specific answer based on the document content.",
                    text, question
                )),
            ],
            MAX_TOKENS,
            TEMPERATURE,
            false,
        );

        match llm.create_chat_completion(&request).await {
            Ok(response) => {
                info!(response_len = response.content.len(), "Chat answer generated");
                ChatResponse {
                    response: response.content,
                    success: true,
                    error: None,
                }
            }
            Err(e) => {
                warn!(error = %e, "Chat request failed");
                ChatResponse {
                    response: format!(
                        "Sorry, I encountered an error while processing your question: {}",
                        e
                    ),
                    success: false,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::provider::testing::{scripted_llm, ScriptedAdapter};

    #[tokio::test]
    async fn test_unavailable_llm() {
        let response = DocumentColleague::answer("Lease", "Who pays?", &LLM::disabled()).await;
        assert!(!response.success);
        assert!(response.response.contains("unavailable"));
    }

    #[tokio::test]
    async fn test_answer_includes_document_and_question() {
        let adapter = ScriptedAdapter::replying("The tenant pays.");
        let requests = adapter.requests.clone();
        let llm = scripted_llm(adapter);

        let response = DocumentColleague::answer("Tenant pays rent.", "Who pays?", &llm).await;
        assert!(response.success);
        assert_eq!(response.response, "The tenant pays.");
        assert!(response.error.is_none());

        let prompt = &requests.lock().unwrap()[0].messages[1].content;
        assert!(prompt.contains("Tenant pays rent."));
        assert!(prompt.contains("Please answer this question: Who pays?"));
    }

    #[tokio::test]
    async fn test_llm_failure_is_reported() {
        let llm = scripted_llm(ScriptedAdapter::failing());
        let response = DocumentColleague::answer("Lease", "Who pays?", &llm).await;
        assert!(!response.success);
        assert!(response.error.is_some());
    }
}
