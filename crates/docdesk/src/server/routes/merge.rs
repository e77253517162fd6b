//! Merge endpoint

use axum::{extract::State, http::header, response::IntoResponse, Json};
use serde::Deserialize;

use crate::error::Result;
use crate::merge::{export, MergeFormat};
use crate::server::state::AppState;

/// Merge request body
#[derive(Debug, Deserialize)]
pub struct MergeRequest {
    /// Stored key/value base record
    pub base: String,
    /// Stored header-and-rows candidate table
    pub candidate: String,
    /// Output format; the configured default when absent
    #[serde(default)]
    pub format: Option<MergeFormat>,
}

/// POST /api/merge - Merge two stored documents into a downloadable sheet
pub async fn merge_documents(
    State(state): State<AppState>,
    Json(request): Json<MergeRequest>,
) -> Result<impl IntoResponse> {
    let format = request
        .format
        .unwrap_or(state.config().merge.default_format);

    let bytes = state
        .run_blocking(move |state| {
            let table = state
                .merge_engine()
                .merge(&request.base, &request.candidate)?;
            export::render(&table, format, &state.config().merge.sheet_name)
        })
        .await?;

    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"merged.{}\"", format.file_extension()),
            ),
        ],
        bytes,
    ))
}
