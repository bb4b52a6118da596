//! Editor Agent
//!
//! Produces the editorial analysis behind `/analyze`. The model is asked for
//! a JSON report; its issues are highlighted with the same span renderer the
//! rule-based analyzer uses. Whenever the model is unavailable, fails, or
//! returns something that is not the expected JSON, the rule-based analyzer
//! answers instead.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::analysis::{self, AnalysisOutcome, Annotator, Category, Issue, Marker};
use crate::llm::LLM;
use crate::types::LLMMessage;

const MAX_TOKENS: u32 = 4096;
const TEMPERATURE: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    Ai,
    Rules,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocumentIntelligence {
    #[serde(rename = "type")]
    pub doc_type: String,
    pub purpose: String,
    pub audience: String,
    pub assessment: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AppealScore {
    pub rating: String,
    pub key_improvements: Vec<String>,
    pub competitive_advantages: Vec<String>,
}

/// The parts of a model report that have no rule-based counterpart.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AiInsights {
    pub document_intelligence: DocumentIntelligence,
    pub contextual_insights: Vec<String>,
    pub strategic_recommendations: Vec<String>,
    pub appeal_score: AppealScore,
    pub colleague_analysis: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditorReport {
    pub outcome: AnalysisOutcome,
    pub engine: Engine,
    pub insights: Option<AiInsights>,
}

impl EditorReport {
    fn rules(text: &str) -> Self {
        Self {
            outcome: analysis::analyze(text),
            engine: Engine::Rules,
            insights: None,
        }
    }
}

// Model reply. Every field is optional so partial reports still parse, and
// scalar fields accept `null`, numbers and booleans as well as strings.

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ModelReport {
    #[serde(deserialize_with = "or_default")]
    document_intelligence: ModelIntelligence,
    #[serde(deserialize_with = "or_default")]
    issues: Vec<ModelIssue>,
    #[serde(deserialize_with = "or_default")]
    real_time_suggestions: Vec<ModelSuggestion>,
    #[serde(deserialize_with = "or_default")]
    projected_recommendations: Vec<ModelRecommendation>,
    #[serde(deserialize_with = "or_default")]
    appeal_score: ModelAppealScore,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ModelIntelligence {
    #[serde(rename = "type", deserialize_with = "lenient_text")]
    doc_type: String,
    #[serde(deserialize_with = "lenient_text")]
    purpose: String,
    #[serde(deserialize_with = "lenient_text")]
    audience: String,
    #[serde(deserialize_with = "lenient_text")]
    context_assessment: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ModelIssue {
    #[serde(deserialize_with = "lenient_text")]
    category: String,
    #[serde(deserialize_with = "lenient_text")]
    original_text: String,
    #[serde(deserialize_with = "lenient_text")]
    suggested_text: String,
    #[serde(deserialize_with = "lenient_text")]
    explanation: String,
    #[serde(deserialize_with = "lenient_text")]
    appeal_impact: String,
    #[serde(deserialize_with = "lenient_text")]
    context_fit: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ModelSuggestion {
    #[serde(deserialize_with = "lenient_text")]
    area: String,
    #[serde(deserialize_with = "lenient_text")]
    suggested_improvement: String,
    #[serde(deserialize_with = "lenient_text")]
    immediate_benefit: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ModelRecommendation {
    #[serde(deserialize_with = "lenient_text")]
    strategic_area: String,
    #[serde(deserialize_with = "lenient_text")]
    recommendation: String,
    #[serde(deserialize_with = "lenient_text")]
    projected_impact: String,
    #[serde(deserialize_with = "lenient_text")]
    implementation_tip: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ModelAppealScore {
    #[serde(deserialize_with = "lenient_text")]
    current_rating: String,
    #[serde(deserialize_with = "lenient_texts")]
    key_improvements: Vec<String>,
    #[serde(deserialize_with = "lenient_texts")]
    competitive_advantages: Vec<String>,
}

/// `null` reads as the default value.
fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn value_text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(value_text)
}

fn lenient_texts<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values: Vec<Value> = or_default(deserializer)?;
    Ok(values
        .into_iter()
        .map(value_text)
        .filter(|text| !text.is_empty())
        .collect())
}

pub struct EditorAgent;

impl EditorAgent {
    /// Analyze `text`. Never fails: any model problem degrades to the
    /// rule-based analyzer.
    pub async fn analyze(text: &str, custom_prompt: Option<&str>, llm: &LLM) -> EditorReport {
        if !llm.is_available() {
            info!("LLM unavailable, using rule-based analysis");
            return EditorReport::rules(text);
        }

        let custom_prompt = custom_prompt.map(str::trim).filter(|p| !p.is_empty());
        let request = llm.request(
            vec![
                LLMMessage::system(Self::system_prompt(custom_prompt)),
                LLMMessage::user(format!(
                    "Please analyze this document and identify specific text corrections:\n\n{}",
                    text
                )),
            ],
            MAX_TOKENS,
            TEMPERATURE,
            true,
        );

        let response = match llm.create_chat_completion(&request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "AI analysis failed, falling back to rules");
                return EditorReport::rules(text);
            }
        };

        match Self::parse_report(&response.content) {
            Ok(report) => {
                let editor_report = Self::build_report(text, report);
                info!(
                    issues = editor_report.outcome.total_issues(),
                    "AI analysis complete"
                );
                editor_report
            }
            Err(e) => {
                warn!(error = %e, "AI reply is not a valid report, falling back to rules");
                EditorReport::rules(text)
            }
        }
    }

    fn system_prompt(custom_prompt: Option<&str>) -> String {
        let mut prompt = String::from(
            r#"You are a senior document editor. Read the document, work out what kind of document it is, who reads it and what it must achieve, then review it in three layers:

1. Corrections: spelling, grammar, punctuation and formatting errors, each with an exact replacement.
2. Real-time suggestions: improvements to language, tone and structure that fit the document's purpose.
3. Projected recommendations: changes that make the document more persuasive, credible and effective for its readers.

Every "original_text" must be copied exactly from the document so it can be located.

Respond with ONLY a JSON object of this shape:
{
  "document_intelligence": {
    "type": "Contract/Agreement/Policy/Report/etc.",
    "purpose": "What the document is trying to accomplish",
    "audience": "Who will read it and what they care about",
    "context_assessment": "Current strengths and improvement opportunities"
  },
  "issues": [
    {
      "category": "Spelling|Grammar|Style|Legal terminology|Clarity|Punctuation|Formatting",
      "original_text": "exact text to fix",
      "suggested_text": "exact replacement",
      "explanation": "What needs changing and why",
      "appeal_impact": "How the change makes the document more effective",
      "context_fit": "Why the change fits the purpose and audience"
    }
  ],
  "real_time_suggestions": [
    {
      "area": "Structure|Language|Legal terms|Business impact|etc.",
      "current_state": "What the document currently does",
      "suggested_improvement": "Specific actionable change",
      "immediate_benefit": "How this helps right now"
    }
  ],
  "projected_recommendations": [
    {
      "strategic_area": "Reader engagement|Legal strength|Future-proofing|etc.",
      "recommendation": "Forward-looking suggestion",
      "projected_impact": "Long-term effect",
      "implementation_tip": "How to apply it"
    }
  ],
  "appeal_score": {
    "current_rating": "X/10",
    "key_improvements": ["3-5 changes that would raise the rating"],
    "competitive_advantages": ["What would make the document stand out"]
  }
}"#,
        );

        if let Some(custom) = custom_prompt {
            prompt.push_str("\n\nADDITIONAL USER INSTRUCTIONS: ");
            prompt.push_str(custom);
            prompt.push_str(
                "\n\nPrioritize the areas named in the user instructions while keeping the same JSON format.",
            );
        }
        prompt
    }

    /// Parse the model's reply, tolerating a fenced code block around it.
    fn parse_report(content: &str) -> serde_json::Result<ModelReport> {
        let json_str = if content.contains("```json") {
            content
                .split("```json")
                .nth(1)
                .and_then(|s| s.split("```").next())
                .unwrap_or(content)
                .trim()
        } else if content.contains("```") {
            content.split("```").nth(1).unwrap_or(content).trim()
        } else {
            content.trim()
        };

        serde_json::from_str(json_str)
    }

    fn build_report(text: &str, report: ModelReport) -> EditorReport {
        let mut annotator = Annotator::new(text);
        let mut issues: Vec<Issue> = Vec::new();

        // model order is kept so indices match what the model reported
        for model_issue in report.issues {
            let original = model_issue.original_text.trim();
            let suggested = model_issue.suggested_text.trim();
            if original.is_empty() || suggested.is_empty() {
                continue;
            }

            let index = issues.len();
            let category = Category::from_label(&model_issue.category);
            let explanation = non_empty(&model_issue.explanation);
            let appeal = non_empty(&model_issue.appeal_impact);
            let context = non_empty(&model_issue.context_fit);

            let mut tooltip = format!("CHANGE: {} → {}", original, suggested);
            let mut details = Vec::new();
            if let Some(explanation) = explanation {
                tooltip.push_str(&format!(" | WHY: {}", explanation));
                details.push(explanation.to_string());
            }
            if let Some(appeal) = appeal {
                tooltip.push_str(&format!(" | APPEAL: {}", appeal));
                details.push(format!("Appeal: {}", appeal));
            }
            if let Some(context) = context {
                tooltip.push_str(&format!(" | CONTEXT: {}", context));
                details.push(format!("Context: {}", context));
            }

            if let Some(range) = annotator.find_free_literal(original) {
                annotator.claim(Marker {
                    range,
                    index,
                    category: category.clone(),
                    tooltip,
                });
            }

            issues.push(Issue {
                index,
                category,
                original: original.to_string(),
                suggestion: Some(suggested.to_string()),
                explanation: explanation.map(str::to_string),
                details,
            });
        }

        let intelligence = report.document_intelligence;
        let doc_type = non_empty(&intelligence.doc_type).unwrap_or("Document").to_string();
        let colleague_analysis = match non_empty(&intelligence.context_assessment) {
            Some(assessment) => format!("{} - {}", doc_type, assessment),
            None => doc_type.clone(),
        };

        let contextual_insights = report
            .real_time_suggestions
            .iter()
            .filter_map(|s| {
                let improvement = non_empty(&s.suggested_improvement)?;
                let area = non_empty(&s.area).unwrap_or("General");
                Some(match non_empty(&s.immediate_benefit) {
                    Some(benefit) => format!("{}: {} → {}", area, improvement, benefit),
                    None => format!("{}: {}", area, improvement),
                })
            })
            .collect();

        let strategic_recommendations = report
            .projected_recommendations
            .iter()
            .filter_map(|r| {
                let recommendation = non_empty(&r.recommendation)?;
                let mut line = format!(
                    "{}: {}",
                    non_empty(&r.strategic_area).unwrap_or("General"),
                    recommendation
                );
                if let Some(impact) = non_empty(&r.projected_impact) {
                    line.push_str(&format!(" | Impact: {}", impact));
                }
                if let Some(tip) = non_empty(&r.implementation_tip) {
                    line.push_str(&format!(" | Tip: {}", tip));
                }
                Some(line)
            })
            .collect();

        let appeal = report.appeal_score;
        let insights = AiInsights {
            document_intelligence: DocumentIntelligence {
                doc_type,
                purpose: intelligence.purpose,
                audience: intelligence.audience,
                assessment: intelligence.context_assessment,
            },
            contextual_insights,
            strategic_recommendations,
            appeal_score: AppealScore {
                rating: non_empty(&appeal.current_rating)
                    .unwrap_or("Not rated")
                    .to_string(),
                key_improvements: appeal.key_improvements,
                competitive_advantages: appeal.competitive_advantages,
            },
            colleague_analysis,
        };

        EditorReport {
            outcome: AnalysisOutcome {
                highlighted_text: annotator.render(),
                issues,
            },
            engine: Engine::Ai,
            insights: Some(insights),
        }
    }
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
