use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use crate::models::{
    ActivityLogResponse, AppState, ProjectFileResponse, ProjectsResponse, UsersResponse,
};
use crate::storage::ProjectFile;
use crate::types::AppResult;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/projects", get(list_users))
        .route("/projects/{username}", get(list_projects))
        .route("/projects/{username}/{document_name}/log", get(activity_log))
        .route(
            "/projects/{username}/{document_name}/{file_name}",
            get(project_file),
        )
        .with_state(state)
}

async fn list_users(State(state): State<AppState>) -> AppResult<Json<UsersResponse>> {
    let users = state.projects.list_users().await?;
    Ok(Json(UsersResponse {
        total_users: users.len(),
        users,
    }))
}

async fn list_projects(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<ProjectsResponse>> {
    let projects = state.projects.list_projects(&username).await?;
    Ok(Json(ProjectsResponse {
        total_projects: projects.len(),
        username,
        projects,
    }))
}

async fn activity_log(
    State(state): State<AppState>,
    Path((username, document_name)): Path<(String, String)>,
) -> AppResult<Json<ActivityLogResponse>> {
    let log_entries = state
        .projects
        .activity()
        .list(&username, &document_name)
        .await?;
    Ok(Json(ActivityLogResponse {
        total_entries: log_entries.len(),
        username,
        document_name,
        log_entries,
    }))
}

/// Extracted text comes back as JSON, activity logs as a plain-text download,
/// anything else as metadata only.
async fn project_file(
    State(state): State<AppState>,
    Path((username, document_name, file_name)): Path<(String, String, String)>,
) -> AppResult<Response> {
    let response = match state
        .projects
        .read_file(&username, &document_name, &file_name)
        .await?
    {
        ProjectFile::Text { filename, content } => {
            Json(ProjectFileResponse::Text { filename, content }).into_response()
        }
        ProjectFile::ActivityLog { filename, content } => (
            [
                (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", filename),
                ),
            ],
            content,
        )
            .into_response(),
        ProjectFile::Binary {
            filename,
            size,
            modified,
        } => Json(ProjectFileResponse::Binary {
            message: format!("Binary file {} is stored on the server", filename),
            filename,
            size,
            modified,
        })
        .into_response(),
    };
    Ok(response)
}
