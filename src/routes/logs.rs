use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, warn};

use crate::activity::ChangeEntry;
use crate::models::{AppState, DocumentLogResponse, LogChangeResponse, UserLogsResponse};
use crate::types::AppResult;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/log-change", post(log_change))
        .route("/get-user-logs/{username}", get(user_logs))
        .route(
            "/get-user-document-log/{username}/{document_name}",
            get(document_log),
        )
        .with_state(state)
}

/// Write failures are reported in the body, not as an HTTP error.
async fn log_change(
    State(state): State<AppState>,
    Json(entry): Json<ChangeEntry>,
) -> Json<LogChangeResponse> {
    match state.change_log.append(&entry).await {
        Ok(path) => {
            info!(user = %entry.username, document = %entry.document_name, "Change logged");
            Json(LogChangeResponse {
                status: "success".to_string(),
                message: "Change logged successfully".to_string(),
                log_file: Some(path.display().to_string()),
            })
        }
        Err(e) => {
            warn!(user = %entry.username, error = %e, "Failed to log change");
            Json(LogChangeResponse {
                status: "error".to_string(),
                message: format!("Failed to log change: {}", e),
                log_file: None,
            })
        }
    }
}

async fn user_logs(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<UserLogsResponse>> {
    let documents = state.change_log.list_documents(&username).await?;
    Ok(Json(UserLogsResponse {
        status: "success".to_string(),
        total_documents: documents.len(),
        username,
        documents,
    }))
}

async fn document_log(
    State(state): State<AppState>,
    Path((username, document_name)): Path<(String, String)>,
) -> AppResult<Json<DocumentLogResponse>> {
    let response = match state.change_log.read(&username, &document_name).await? {
        Some(log) => DocumentLogResponse {
            status: "success".to_string(),
            log_content: log.log_content,
            total_entries: log.total_entries,
            entries: log.entries,
            username,
            document_name,
        },
        None => DocumentLogResponse {
            status: "success".to_string(),
            log_content: format!(
                "No changes have been logged yet for document '{}' by user '{}'.",
                document_name, username
            ),
            total_entries: 0,
            entries: Vec::new(),
            username,
            document_name,
        },
    };
    Ok(Json(response))
}
