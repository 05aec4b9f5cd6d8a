//! HTTP handler definitions for the schema server.
//!
//! Defines `AppState`, the shared state carried through axum extractors,
//! and re-exports the handler functions used by the router.

pub mod health;
pub mod rows;
pub mod schema;

pub use health::{health_handler, liveness_handler};
pub use rows::display_rows;
pub use schema::{list_resources, record_schema, resource_schema};

use std::sync::Arc;
use std::time::Instant;

use crate::registry::ResourceRegistry;

/// Shared application state passed to all axum handlers via `State` extraction.
///
/// Holds `Arc` references so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Frozen resource definitions.
    pub resources: Arc<ResourceRegistry>,
    /// Server process start time, used for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    #[must_use]
    pub fn new(resources: Arc<ResourceRegistry>) -> Self {
        Self {
            resources,
            start_time: Instant::now(),
        }
    }
}
