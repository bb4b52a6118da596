use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
    Json, Router,
};
use tracing::{info, warn};

use crate::extract::{extract, DocumentFormat};
use crate::models::{AppState, UploadResponse, ANONYMOUS};
use crate::types::{AppError, AppResult};

pub fn router(state: AppState) -> Router {
    let body_limit = state.config.server.max_upload_bytes;
    Router::new()
        .route("/upload", post(upload))
        .route("/upload-pdf", post(upload))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

struct UploadedFile {
    filename: String,
    content_type: Option<String>,
    data: Bytes,
}

fn multipart_error(e: impl std::fmt::Display) -> AppError {
    AppError::InvalidRequest(format!("Malformed upload: {}", e))
}

async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    let mut file: Option<UploadedFile> = None;
    let mut username = ANONYMOUS.to_string();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let filename = field.file_name().unwrap_or("document").to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(multipart_error)?;
                file = Some(UploadedFile {
                    filename,
                    content_type,
                    data,
                });
            }
            Some("username") => {
                let value = field.text().await.map_err(multipart_error)?;
                if !value.trim().is_empty() {
                    username = value.trim().to_string();
                }
            }
            _ => {}
        }
    }

    let file = file.ok_or_else(|| AppError::InvalidRequest("Missing 'file' field".to_string()))?;
    let format = DocumentFormat::detect(file.content_type.as_deref(), &file.filename)?;
    info!(
        filename = %file.filename,
        format = %format,
        size = file.data.len(),
        user = %username,
        "Upload received"
    );

    // nothing is written to disk unless extraction succeeds
    let data = file.data.clone();
    let text = tokio::task::spawn_blocking(move || extract(&data, format))
        .await
        .map_err(|e| AppError::Internal(format!("Extraction task failed: {}", e)))?
        .inspect_err(|e| warn!(filename = %file.filename, error = %e, "Extraction failed"))?;

    let saved = state
        .projects
        .save_upload(&username, &file.filename, &file.data, &text)
        .await?;
    let user_dir = crate::activity::safe_user_name(&username);

    Ok(Json(UploadResponse {
        message: format!(
            "{} uploaded and processed successfully. Saved to projects/{}/{}/",
            format, user_dir, saved.document_name
        ),
        text,
        filename: file.filename,
        document_name: saved.document_name,
        file_type: format,
        project_path: saved.project_path.display().to_string(),
    }))
}
