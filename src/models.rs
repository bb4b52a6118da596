use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::activity::{ActivityEntry, ChangeLog, ChangeRecord, DocumentLogSummary};
use crate::agents::{AiInsights, EditorReport, Engine};
use crate::analysis::Issue;
use crate::config::Config;
use crate::extract::DocumentFormat;
use crate::llm::LLM;
use crate::storage::{ProjectStore, ProjectSummary, UserSummary};

pub const ANONYMOUS: &str = "anonymous";

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub llm: Arc<LLM>,
    pub projects: ProjectStore,
    pub change_log: ChangeLog,
}

impl AppState {
    pub fn new(config: Config, llm: LLM) -> Self {
        Self {
            projects: ProjectStore::new(config.storage.projects_dir.clone()),
            change_log: ChangeLog::new(config.storage.logs_dir.clone()),
            llm: Arc::new(llm),
            config,
        }
    }
}

/// Caller identity attached to analysis and chat requests. Activity is only
/// recorded for named users working on a named document.
pub fn document_owner<'a>(
    username: Option<&'a str>,
    document_name: Option<&'a str>,
) -> Option<(&'a str, &'a str)> {
    let username = username.map(str::trim).filter(|u| !u.is_empty() && *u != ANONYMOUS)?;
    let document_name = document_name.map(str::trim).filter(|d| !d.is_empty())?;
    Some((username, document_name))
}

// Service info

#[derive(Debug, Clone, Serialize)]
pub struct RootResponse {
    pub message: String,
    pub status: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub llm_available: bool,
    pub llm_provider: String,
    pub llm_model: String,
}

// Analysis

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
    #[serde(default)]
    pub custom_prompt: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub document_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResponse {
    pub highlighted_text: String,
    pub issues_found: Vec<String>,
    pub total_issues: usize,
    pub issues: Vec<Issue>,
    pub engine: Engine,
    #[serde(flatten)]
    pub insights: Option<AiInsights>,
}

impl From<EditorReport> for AnalysisResponse {
    fn from(report: EditorReport) -> Self {
        Self {
            issues_found: report.outcome.issues_found(),
            total_issues: report.outcome.total_issues(),
            highlighted_text: report.outcome.highlighted_text,
            issues: report.outcome.issues,
            engine: report.engine,
            insights: report.insights,
        }
    }
}

// Assistant

#[derive(Debug, Clone, Deserialize)]
pub struct LegalAdviceRequest {
    pub text: String,
    #[serde(default)]
    pub question: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LegalAdviceResponse {
    pub advice: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_used: Option<String>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub text: String,
    pub question: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub document_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// Uploads

#[derive(Debug, Clone, Serialize)]
pub struct UploadResponse {
    pub text: String,
    pub filename: String,
    pub document_name: String,
    pub file_type: DocumentFormat,
    pub project_path: String,
    pub message: String,
}

// Change log

#[derive(Debug, Clone, Serialize)]
pub struct LogChangeResponse {
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserLogsResponse {
    pub status: String,
    pub username: String,
    pub documents: Vec<DocumentLogSummary>,
    pub total_documents: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentLogResponse {
    pub status: String,
    pub username: String,
    pub document_name: String,
    pub log_content: String,
    pub total_entries: usize,
    pub entries: Vec<ChangeRecord>,
}

// Projects

#[derive(Debug, Clone, Serialize)]
pub struct UsersResponse {
    pub users: Vec<UserSummary>,
    pub total_users: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectsResponse {
    pub username: String,
    pub projects: Vec<ProjectSummary>,
    pub total_projects: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityLogResponse {
    pub username: String,
    pub document_name: String,
    pub log_entries: Vec<ActivityEntry>,
    pub total_entries: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProjectFileResponse {
    Text {
        filename: String,
        content: String,
    },
    Binary {
        filename: String,
        size: u64,
        modified: DateTime<Utc>,
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis;

    #[test]
    fn test_document_owner() {
        assert_eq!(document_owner(Some("amy"), Some("Lease")), Some(("amy", "Lease")));
        assert_eq!(document_owner(Some("anonymous"), Some("Lease")), None);
        assert_eq!(document_owner(None, Some("Lease")), None);
        assert_eq!(document_owner(Some("amy"), Some("  ")), None);
    }

    #[test]
    fn test_rule_based_response_shape() {
        let report = EditorReport {
            outcome: analysis::analyze("Signed wheras agreed."),
            engine: Engine::Rules,
            insights: None,
        };
        let value = serde_json::to_value(AnalysisResponse::from(report)).unwrap();

        assert_eq!(value["engine"], "rules");
        assert_eq!(value["total_issues"], 1);
        assert_eq!(value["issues_found"][0], "Spelling: wheras → whereas");
        assert_eq!(value["issues"][0]["category"], "Spelling");
        assert!(value.get("document_intelligence").is_none());
    }

    #[test]
    fn test_ai_extras_are_flattened() {
        let report = EditorReport {
            outcome: analysis::analyze("Plain text."),
            engine: Engine::Ai,
            insights: Some(AiInsights {
                colleague_analysis: "Memo".to_string(),
                ..Default::default()
            }),
        };
        let value = serde_json::to_value(AnalysisResponse::from(report)).unwrap();
        assert_eq!(value["engine"], "ai");
        assert_eq!(value["colleague_analysis"], "Memo");
        assert!(value["document_intelligence"].is_object());
        assert!(value["appeal_score"].is_object());
    }

    #[test]
    fn test_project_file_response_tag() {
        let value = serde_json::to_value(ProjectFileResponse::Text {
            filename: "a_extracted.txt".to_string(),
            content: "hello".to_string(),
        })
        .unwrap();
        assert_eq!(value["type"], "text");
        assert_eq!(value["content"], "hello");
    }
}
