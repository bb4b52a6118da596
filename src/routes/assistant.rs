use axum::{extract::State, routing::post, Json, Router};
use tracing::info;

use crate::activity::ActivityAction;
use crate::agents::{DocumentColleague, LegalAdvisor};
use crate::models::{
    document_owner, AppState, ChatRequest, ChatResponse, LegalAdviceRequest, LegalAdviceResponse,
};
use crate::types::{AppError, AppResult};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/legal-advice", post(legal_advice))
        .route("/chat", post(chat))
        .with_state(state)
}

async fn legal_advice(
    State(state): State<AppState>,
    Json(request): Json<LegalAdviceRequest>,
) -> AppResult<Json<LegalAdviceResponse>> {
    if request.text.trim().is_empty() {
        return Err(AppError::EmptyInput);
    }
    info!(text_len = request.text.len(), "Legal advice request received");

    Ok(Json(
        LegalAdvisor::advise(&request.text, request.question.as_deref(), &state.llm).await,
    ))
}

async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> AppResult<Json<ChatResponse>> {
    if request.question.trim().is_empty() {
        return Err(AppError::InvalidRequest("Question must not be empty".to_string()));
    }
    info!(question_len = request.question.len(), "Chat request received");

    if let Some((user, document)) =
        document_owner(request.username.as_deref(), request.document_name.as_deref())
    {
        state
            .projects
            .log_activity(
                user,
                document,
                ActivityAction::Chat,
                &format!("Question asked: '{}'", request.question),
            )
            .await;
    }

    Ok(Json(
        DocumentColleague::answer(&request.text, &request.question, &state.llm).await,
    ))
}
