use axum::{extract::State, routing::post, Json, Router};
use tracing::info;

use crate::activity::ActivityAction;
use crate::agents::EditorAgent;
use crate::models::{document_owner, AnalysisResponse, AnalyzeRequest, AppState};
use crate::types::{AppError, AppResult};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/analyze", post(analyze))
        .with_state(state)
}

async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> AppResult<Json<AnalysisResponse>> {
    if request.text.trim().is_empty() {
        return Err(AppError::EmptyInput);
    }

    let custom_prompt = request.custom_prompt.as_deref().unwrap_or("");
    info!(
        text_len = request.text.len(),
        custom_prompt = !custom_prompt.is_empty(),
        "Analysis request received"
    );

    if let Some((user, document)) =
        document_owner(request.username.as_deref(), request.document_name.as_deref())
    {
        state
            .projects
            .log_activity(
                user,
                document,
                ActivityAction::Analyze,
                &format!("Document analyzed with prompt: '{}'", custom_prompt),
            )
            .await;
    }

    let report =
        EditorAgent::analyze(&request.text, request.custom_prompt.as_deref(), &state.llm).await;
    info!(engine = ?report.engine, issues = report.outcome.total_issues(), "Analysis complete");

    Ok(Json(report.into()))
}
