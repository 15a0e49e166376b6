use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    http::{header, StatusCode},
    middleware::from_fn,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};

mod config;
pub mod request_id;
mod web;

pub use config::{ApiIngressConfig, DEFAULT_BODY_LIMIT_BYTES};

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP host: wraps module routers with the shared middleware stack, exposes
/// `/health` and the OpenAPI document, and serves until cancelled.
pub struct ApiIngress {
    config: ApiIngressConfig,
    request_timeout: Duration,
    openapi: Option<utoipa::openapi::OpenApi>,
}

impl ApiIngress {
    pub fn new(config: ApiIngressConfig) -> Self {
        Self {
            config,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            openapi: None,
        }
    }

    /// Per-request handler timeout; zero keeps the default.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        if !timeout.is_zero() {
            self.request_timeout = timeout;
        }
        self
    }

    /// Document served at `/openapi.json` when docs are enabled.
    pub fn with_openapi(mut self, doc: utoipa::openapi::OpenApi) -> Self {
        self.openapi = Some(doc);
        self
    }

    /// `bind_addr` from the module section, else the server-level fallback.
    pub fn resolve_bind_addr(&self, fallback: &str) -> Result<SocketAddr> {
        let raw = self.config.bind_addr.as_deref().unwrap_or(fallback);
        raw.parse().with_context(|| format!("Invalid bind address '{raw}'"))
    }

    /// Merge module routes with the host endpoints and apply the middleware stack.
    pub fn build_router(&self, routes: Router) -> Result<Router> {
        let mut router = Router::new()
            .route("/health", get(web::health_check))
            .merge(routes);

        if self.config.enable_docs {
            if let Some(doc) = &self.openapi {
                let value = Arc::new(
                    serde_json::to_value(doc).context("Failed to serialize OpenAPI document")?,
                );
                tracing::info!(
                    paths = doc.paths.paths.len(),
                    "Serving OpenAPI document at /openapi.json"
                );
                router = router
                    .route(
                        "/openapi.json",
                        get(move || {
                            let v = value.clone();
                            async move {
                                ([(header::CACHE_CONTROL, "no-store")], Json((*v).clone()))
                                    .into_response()
                            }
                        }),
                    )
                    .route("/docs", get(web::serve_docs));
            }
        }

        // Layers added later wrap the earlier ones, so this reads innermost first:
        // BodyLimit <- CORS <- Timeout <- Trace <- push_req_id
        //   <- PropagateRequestId <- SetRequestId
        router = router.layer(RequestBodyLimitLayer::new(self.config.body_limit_bytes));

        if self.config.cors_enabled {
            router = router.layer(CorsLayer::permissive());
        }

        router = router.layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            self.request_timeout,
        ));
        router = router.layer(request_id::create_trace_layer());
        router = router.layer(from_fn(request_id::push_req_id_to_extensions));

        let x_request_id = request_id::header();
        router = router.layer(PropagateRequestIdLayer::new(x_request_id.clone()));
        router = router.layer(SetRequestIdLayer::new(x_request_id, request_id::MakeReqId));

        Ok(router)
    }

    /// Bind `addr` and serve until `cancel` fires.
    pub async fn serve(
        &self,
        router: Router,
        addr: SocketAddr,
        cancel: CancellationToken,
    ) -> Result<()> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;
        self.serve_listener(listener, router, cancel).await
    }

    /// Serve on an already bound listener until `cancel` fires.
    pub async fn serve_listener(
        &self,
        listener: TcpListener,
        router: Router,
        cancel: CancellationToken,
    ) -> Result<()> {
        let local = listener.local_addr()?;
        tracing::info!("HTTP server bound on {}", local);

        let shutdown = async move {
            cancel.cancelled().await;
            tracing::info!("HTTP server shutting down gracefully (cancellation)");
        };

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .context("HTTP server failed")
    }
}
