//! Display rows: stored record values rewritten by each field's display
//! callback, so the client shows what the resource defines.

use adminforge_core::View;
use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use serde_json::{Map, Value};

use super::AppState;
use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct RowsResponse {
    pub resource: String,
    pub view: View,
    pub rows: Vec<Map<String, Value>>,
}

/// `POST {prefix}/{resource}/{action}` with a JSON array of records.
///
/// # Errors
///
/// [`ApiError::ResourceNotFound`] for an unregistered resource and
/// [`ApiError::UnknownAction`] when the action names no view.
pub async fn display_rows(
    State(state): State<AppState>,
    Path((name, action)): Path<(String, String)>,
    Json(records): Json<Vec<Map<String, Value>>>,
) -> Result<Json<RowsResponse>, ApiError> {
    let resource = state
        .resources
        .get(&name)
        .ok_or(ApiError::ResourceNotFound { name })?;
    let view = View::from_action(&action).ok_or(ApiError::UnknownAction { action })?;

    let rows: Vec<_> = records
        .iter()
        .map(|record| resource.display_row(view, record))
        .collect();
    tracing::debug!(resource = resource.name(), view = view.as_str(), rows = rows.len(), "rows displayed");

    Ok(Json(RowsResponse {
        resource: resource.name().to_string(),
        view,
        rows,
    }))
}
