//! Document management endpoints

use axum::{
    body::Bytes,
    extract::{Multipart, Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{DocumentInfo, DocumentType};

/// Response for the document list
#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentListResponse {
    /// Documents in storage order
    pub documents: Vec<DocumentInfo>,
    pub total_count: usize,
}

/// An upload the store refused
#[derive(Debug, Serialize, Deserialize)]
pub struct RejectedUpload {
    pub filename: String,
    pub reason: String,
}

/// Response for a multipart upload
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    /// True when at least one file was stored
    pub success: bool,
    /// Stored (sanitized) filenames
    pub files: Vec<String>,
    pub rejected: Vec<RejectedUpload>,
}

/// GET /api/documents - List all documents
pub async fn list_documents(State(state): State<AppState>) -> Result<Json<DocumentListResponse>> {
    let documents = state
        .run_blocking(|state| state.store().list_info())
        .await?;
    let total_count = documents.len();

    Ok(Json(DocumentListResponse {
        documents,
        total_count,
    }))
}

/// GET /api/documents/:filename - Download a stored document
pub async fn download_document(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse> {
    let name = filename.clone();
    let data = state
        .run_blocking(move |state| state.store().read_document(&name))
        .await?;

    let content_type = DocumentType::from_filename(&filename).mime_type();
    Ok(([(header::CONTENT_TYPE, content_type)], data))
}

/// DELETE /api/documents/:filename - Delete a document
pub async fn delete_document(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let name = filename.clone();
    state
        .run_blocking(move |state| state.store().delete_document(&name))
        .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "filename": filename,
    })))
}

/// POST /api/upload - Store every file of a multipart request
///
/// Files whose name or extension the store refuses are reported in `rejected`; any other
/// storage failure aborts the request.
pub async fn upload_documents(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let mut files = Vec::new();
    let mut rejected = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or("").to_string();
        if field_name != "files[]" && field_name != "files" {
            tracing::debug!("Ignoring multipart field '{}'", field_name);
            continue;
        }

        let filename = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => {
                tracing::debug!("Skipping file part without a filename");
                continue;
            }
        };

        let data: Bytes = field.bytes().await.map_err(|e| {
            tracing::warn!("Failed to read upload '{}': {}", filename, e);
            Error::from(e)
        })?;

        tracing::info!("Uploading file: {} ({} bytes)", filename, data.len());

        let raw_name = filename.clone();
        let stored = state
            .run_blocking(move |state| state.store().write_document(&raw_name, &data))
            .await;

        match stored {
            Ok(stored) => files.push(stored),
            Err(e @ (Error::UnsupportedFileType(_) | Error::InvalidFilename(_))) => {
                tracing::warn!("Rejected upload '{}': {}", filename, e);
                rejected.push(RejectedUpload {
                    filename,
                    reason: e.to_string(),
                });
            }
            Err(e) => return Err(e),
        }
    }

    Ok(Json(UploadResponse {
        success: !files.is_empty(),
        files,
        rejected,
    }))
}
