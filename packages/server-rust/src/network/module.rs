//! Schema server with deferred startup lifecycle.
//!
//! `new()` takes the frozen registry, `start()` binds the TCP listener, and
//! `serve()` accepts connections until shutdown. The bound port is known
//! between `start()` and `serve()`.

use std::future::Future;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use super::config::ServerConfig;
use super::handlers::{
    display_rows, health_handler, list_resources, liveness_handler, record_schema,
    resource_schema, AppState,
};
use super::middleware::apply_http_layers;
use crate::registry::ResourceRegistry;

/// Manages the HTTP server lifecycle.
pub struct AdminServer {
    config: ServerConfig,
    listener: Option<TcpListener>,
    resources: Arc<ResourceRegistry>,
}

impl AdminServer {
    /// Creates the server without binding any port.
    #[must_use]
    pub fn new(config: ServerConfig, resources: ResourceRegistry) -> Self {
        Self {
            config,
            listener: None,
            resources: Arc::new(resources),
        }
    }

    /// Returns a shared reference to the resource registry.
    #[must_use]
    pub fn resources(&self) -> Arc<ResourceRegistry> {
        Arc::clone(&self.resources)
    }

    /// Assembles the axum router with all routes and middleware.
    ///
    /// Routes:
    /// - `GET /health` -- health JSON
    /// - `GET /health/live` -- liveness probe
    /// - `GET {prefix}/resources` -- resource listing
    /// - `GET {prefix}/{resource}/{action}` -- view schema
    /// - `POST {prefix}/{resource}/{action}` -- display rows of posted records
    /// - `GET {prefix}/{resource}/{id}/{action}` -- view schema of a record
    pub fn build_router(&self) -> Router {
        let state = AppState::new(Arc::clone(&self.resources));
        let api = Router::new()
            .route("/resources", get(list_resources))
            .route("/{resource}/{action}", get(resource_schema).post(display_rows))
            .route("/{resource}/{id}/{action}", get(record_schema));

        let router = Router::new()
            .route("/health", get(health_handler))
            .route("/health/live", get(liveness_handler));

        // axum refuses to nest at the root.
        let router = match normalize_prefix(&self.config.route_prefix) {
            Some(prefix) => router.nest(&prefix, api),
            None => router.merge(api),
        };

        apply_http_layers(router, &self.config).with_state(state)
    }

    /// Binds the TCP listener to the configured host and port.
    ///
    /// Returns the actual bound port, which differs from the configured
    /// port when port 0 is used.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound (e.g., port in use).
    pub async fn start(&mut self) -> anyhow::Result<u16> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&addr).await?;
        let port = listener.local_addr()?.port();

        info!("TCP listener bound to {}:{}", self.config.host, port);

        self.listener = Some(listener);
        Ok(port)
    }

    /// Serves requests until the shutdown signal fires.
    ///
    /// # Errors
    ///
    /// Returns an error if `start()` was not called first or the server
    /// hits a fatal I/O error.
    pub async fn serve(
        mut self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        let router = self.build_router();
        let Some(listener) = self.listener.take() else {
            anyhow::bail!("start() must be called before serve()");
        };

        info!(resources = self.resources.len(), "serving schema requests");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("server stopped");
        Ok(())
    }
}

/// Trims trailing slashes and ensures a leading one. `None` means the root.
fn normalize_prefix(prefix: &str) -> Option<String> {
    let trimmed = prefix.trim_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(format!("/{trimmed}"))
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;

    fn server(prefix: &str) -> AdminServer {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            route_prefix: prefix.to_string(),
            ..ServerConfig::default()
        };
        AdminServer::new(config, ResourceRegistry::default())
    }

    #[test]
    fn new_creates_server_without_binding() {
        let server = server("/api/admin");
        assert!(server.listener.is_none());
    }

    #[test]
    fn resources_returns_shared_arc() {
        let server = server("/api/admin");
        assert!(Arc::ptr_eq(&server.resources(), &server.resources()));
    }

    #[test]
    fn normalize_prefix_variants() {
        assert_eq!(normalize_prefix("/api/admin"), Some("/api/admin".to_string()));
        assert_eq!(normalize_prefix("api/admin/"), Some("/api/admin".to_string()));
        assert_eq!(normalize_prefix("/"), None);
        assert_eq!(normalize_prefix(""), None);
    }

    #[tokio::test]
    async fn root_prefix_merges_routes() {
        let response = server("/")
            .build_router()
            .oneshot(Request::builder().uri("/resources").body(Body::empty()).expect("request"))
            .await
            .expect("infallible");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn schema_response_carries_request_id() {
        let response = server("/api/admin")
            .build_router()
            .oneshot(
                Request::builder()
                    .uri("/api/admin/resources")
                    .header("x-request-id", "req-42")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("infallible");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get("x-request-id").expect("request id"), "req-42");
    }

    #[tokio::test]
    async fn start_binds_to_os_assigned_port() {
        let mut server = server("/api/admin");
        let port = server.start().await.expect("start should succeed");
        assert!(port > 0, "OS-assigned port should be > 0");
        assert!(server.listener.is_some());
    }

    #[tokio::test]
    async fn serve_fails_without_start() {
        let err = server("/api/admin")
            .serve(std::future::pending::<()>())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "start() must be called before serve()");
    }

    #[tokio::test]
    async fn serve_stops_on_shutdown_signal() {
        let mut server = server("/api/admin");
        server.start().await.expect("start should succeed");
        server.serve(async {}).await.expect("graceful stop");
    }
}
