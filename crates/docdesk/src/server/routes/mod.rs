//! API routes for the document desk server

pub mod documents;
pub mod merge;
pub mod search;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Document management
        .route("/documents", get(documents::list_documents))
        .route(
            "/documents/:filename",
            get(documents::download_document).delete(documents::delete_document),
        )
        // Upload - with larger body limit for multipart files
        .route(
            "/upload",
            post(documents::upload_documents).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route("/search", get(search::search_documents))
        .route("/merge", post(merge::merge_documents))
        .route("/info", get(info))
}

/// API info endpoint
async fn info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "docdesk",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Keyword search across uploaded documents and named-key spreadsheet merging",
        "endpoints": {
            "GET /api/documents": "List stored documents",
            "POST /api/upload": "Upload documents (multipart field 'files[]')",
            "GET /api/documents/:filename": "Download a stored document",
            "DELETE /api/documents/:filename": "Delete a stored document",
            "GET /api/search?keyword=": "Match a keyword against filenames and content",
            "POST /api/merge": "Merge a candidate table into a base record"
        },
        "supported_types": ["csv", "xlsx", "xls", "pdf", "docx", "hwp"]
    }))
}
