//! API Routes
//!
//! - `GET /`, `GET /api/health` - service info and LLM availability
//! - `POST /analyze` - rule/AI document analysis with highlighted text
//! - `POST /legal-advice`, `POST /chat` - free-form assistant calls
//! - `POST /upload`, `POST /upload-pdf` - PDF/DOCX upload and extraction
//! - `POST /log-change`, `GET /get-user-logs/..`, `GET /get-user-document-log/..`
//! - `GET /projects/..` - stored projects, files and activity

pub mod analyze;
pub mod assistant;
pub mod documents;
pub mod health;
pub mod logs;
pub mod projects;

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::middleware::cors_layer;
use crate::models::AppState;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let cors = cors_layer(&state.config.server);

    Router::new()
        .merge(health::router(state.clone()))
        .merge(analyze::router(state.clone()))
        .merge(assistant::router(state.clone()))
        .merge(documents::router(state.clone()))
        .merge(logs::router(state.clone()))
        .merge(projects::router(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
