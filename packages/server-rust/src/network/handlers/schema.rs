//! Schema endpoints consumed by the admin rendering client.

use adminforge_core::{Column, FieldSchema, SheetHeader, View};
use axum::extract::{OriginalUri, Path, State};
use axum::Json;
use serde::Serialize;

use super::AppState;
use crate::error::ApiError;

/// One entry of the resource listing.
#[derive(Debug, Serialize)]
pub struct ResourceSummary {
    pub name: String,
    pub title: String,
}

/// Schema of one resource for one view.
#[derive(Debug, Serialize)]
pub struct SchemaResponse {
    pub resource: String,
    pub title: String,
    pub view: View,
    #[serde(flatten)]
    pub body: SchemaBody,
}

/// View-dependent part of a [`SchemaResponse`].
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SchemaBody {
    /// Table columns of the index view.
    Columns { columns: Vec<Column> },
    /// Spreadsheet headers of export and import.
    Sheet { fields: Vec<SheetHeader> },
    /// Rendered form or detail fields.
    Form { fields: Vec<FieldSchema> },
}

/// Lists the registered resources in registration order.
pub async fn list_resources(State(state): State<AppState>) -> Json<Vec<ResourceSummary>> {
    let listing = state
        .resources
        .iter()
        .map(|r| ResourceSummary {
            name: r.name().to_string(),
            title: r.title().to_string(),
        })
        .collect();
    Json(listing)
}

/// `GET {prefix}/{resource}/{action}`.
///
/// # Errors
///
/// [`ApiError::ResourceNotFound`] for an unregistered resource and
/// [`ApiError::UnknownAction`] when the action names no view.
pub async fn resource_schema(
    State(state): State<AppState>,
    Path((resource, action)): Path<(String, String)>,
    OriginalUri(uri): OriginalUri,
) -> Result<Json<SchemaResponse>, ApiError> {
    schema_for(&state, &resource, &action, uri.path()).map(Json)
}

/// `GET {prefix}/{resource}/{id}/{action}`, e.g. `/article/7/edit`. The
/// record id does not influence the schema.
///
/// # Errors
///
/// Same as [`resource_schema`].
pub async fn record_schema(
    State(state): State<AppState>,
    Path((resource, _id, action)): Path<(String, String, String)>,
    OriginalUri(uri): OriginalUri,
) -> Result<Json<SchemaResponse>, ApiError> {
    schema_for(&state, &resource, &action, uri.path()).map(Json)
}

fn schema_for(
    state: &AppState,
    name: &str,
    action: &str,
    path: &str,
) -> Result<SchemaResponse, ApiError> {
    let resource = state
        .resources
        .get(name)
        .ok_or_else(|| ApiError::ResourceNotFound {
            name: name.to_string(),
        })?;
    let view = View::from_action(action).ok_or_else(|| ApiError::UnknownAction {
        action: action.to_string(),
    })?;

    let body = match view {
        View::Index => SchemaBody::Columns {
            columns: resource.columns(),
        },
        View::Export | View::Import => SchemaBody::Sheet {
            fields: resource.sheet_headers(view),
        },
        View::Detail | View::Creation | View::Update => SchemaBody::Form {
            fields: resource.form_schema(view, path),
        },
    };

    tracing::debug!(resource = %name, view = view.as_str(), path, "schema served");

    Ok(SchemaResponse {
        resource: resource.name().to_string(),
        title: resource.title().to_string(),
        view,
        body,
    })
}
