//! Legal Advisor
//!
//! Free-form legal review of a document, answering an optional question.

use tracing::{info, warn};

use crate::llm::LLM;
use crate::models::LegalAdviceResponse;
use crate::types::LLMMessage;

pub const DEFAULT_QUESTION: &str =
    "Please provide legal analysis and suggestions for this document.";
const MAX_TOKENS: u32 = 1500;
const TEMPERATURE: f32 = 0.3;

const SYSTEM_PROMPT: &str = "You are an expert legal assistant specializing in document analysis and legal writing. \
Give professional, accurate analysis and make clear that it is AI-generated guidance, not a substitute for professional legal counsel.

Focus on:
1. Legal structure and formatting
2. Potential legal issues or gaps
3. Clarity and precision of legal language
4. Compliance considerations
5. Practical recommendations

Always end with a disclaimer recommending professional legal advice for specific situations.";

pub struct LegalAdvisor;

impl LegalAdvisor {
    pub async fn advise(text: &str, question: Option<&str>, llm: &LLM) -> LegalAdviceResponse {
        if !llm.is_available() {
            return LegalAdviceResponse {
                advice: "Legal advice is currently unavailable. Configure an LLM API key to enable it."
                    .to_string(),
                model_used: None,
                success: false,
                error: Some("LLM client not configured".to_string()),
            };
        }

        let question = question
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .unwrap_or(DEFAULT_QUESTION);
        let request = llm.request(
            vec![
                LLMMessage::system(SYSTEM_PROMPT),
                LLMMessage::user(Self::user_prompt(text, question)),
            ],
            MAX_TOKENS,
            TEMPERATURE,
            false,
        );

        match llm.create_chat_completion(&request).await {
            Ok(response) => {
                info!(advice_len = response.content.len(), "Legal advice generated");
                LegalAdviceResponse {
                    advice: response.content,
                    model_used: Some(llm.model().to_string()),
                    success: true,
                    error: None,
                }
            }
            Err(e) => {
                warn!(error = %e, "Legal advice request failed");
                LegalAdviceResponse {
                    advice: format!(
                        "Sorry, I encountered an error while generating legal advice: {}",
                        e
                    ),
                    model_used: None,
                    success: false,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    fn user_prompt(text: &str, question: &str) -> String {
        format!(
            r#"Please analyze this legal document and provide detailed advice:

DOCUMENT TEXT:
{text}

SPECIFIC QUESTION: {question}

Please provide:
1. Overall document assessment
2. Specific legal issues identified
3. Suggestions for improvement
4. Risk assessment
5. Next steps recommendations"#,
            text = text,
            question = question
        )
    }
}
