//! HTTP API server
//!
//! Serves the catalog over Axum: model search, tag browsing, registry
//! sync and the admin maintenance endpoints.

pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;
pub mod types;

use std::net::SocketAddr;

use axum::{
    extract::Request,
    http::{header, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

pub use state::AppState;

use types::LivenessResponse;

/// Web server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            enable_cors: true,
        }
    }
}

/// Start the web server.
///
/// Binds to the configured port, incrementing past ports already in use.
/// Returns the spawned server task and the port actually bound.
pub async fn start_server(
    config: ServerConfig,
    state: AppState,
) -> anyhow::Result<(tokio::task::JoinHandle<()>, u16)> {
    info!("Starting web server on {}:{}", config.host, config.port);

    let app = build_app(state, config.enable_cors);

    let host_ip = config.host.parse::<std::net::IpAddr>()?;
    let mut port = config.port;
    let max_attempts = 100;

    let listener = loop {
        let addr = SocketAddr::from((host_ip, port));

        match TcpListener::bind(addr).await {
            Ok(listener) => {
                if port != config.port {
                    info!("Port {} was taken, using port {} instead", config.port, port);
                }
                break listener;
            }
            Err(e) => {
                if port - config.port >= max_attempts {
                    return Err(anyhow::anyhow!(
                        "Could not bind to any port between {} and {} (last error: {})",
                        config.port,
                        port,
                        e
                    ));
                }
                tracing::debug!("Port {} is taken, trying next port", port);
                port += 1;
            }
        }
    };

    info!("Web server listening on http://{}:{}", config.host, port);

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("Server error: {}", e);
        }
    });

    Ok((handle, port))
}

/// Build the Axum app with all routes and middleware.
pub fn build_app(state: AppState, enable_cors: bool) -> Router {
    let mut router = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check))
        .route("/openapi.json", get(serve_openapi_json))
        .route("/openapi.yaml", get(serve_openapi_yaml))
        .route("/tags", get(routes::list_tags))
        .route("/models", get(routes::list_models))
        .route("/sync", post(routes::sync_models))
        .route("/sync/images", post(routes::sync_images))
        .route("/admin/update-images", post(routes::update_images))
        .route("/admin/retag-missing", post(routes::retag_missing_models))
        .route("/admin/enrich", post(routes::enrich_models))
        .route(
            "/admin/cleanup-reserved-tag",
            post(routes::cleanup_reserved_tag),
        )
        .with_state(state);

    router = router.layer(axum::middleware::from_fn(logging_middleware));

    if enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
            .allow_credentials(false);

        router = router.layer(cors);
    }

    router
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses(
        (status = 200, description = "Server is healthy", body = LivenessResponse)
    )
)]
async fn health_check() -> Json<LivenessResponse> {
    Json(LivenessResponse { ok: true })
}

/// Liveness probe at the root
#[utoipa::path(
    get,
    path = "/",
    tag = "system",
    responses(
        (status = 200, description = "Server is alive", body = LivenessResponse)
    )
)]
async fn root_handler() -> Json<LivenessResponse> {
    Json(LivenessResponse { ok: true })
}

/// Serve OpenAPI specification as JSON
#[utoipa::path(
    get,
    path = "/openapi.json",
    tag = "system",
    responses(
        (status = 200, description = "OpenAPI specification in JSON format", content_type = "application/json"),
        (status = 500, description = "Failed to generate specification")
    )
)]
async fn serve_openapi_json() -> impl IntoResponse {
    match openapi::get_openapi_json() {
        Ok(json) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            json,
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to generate OpenAPI spec: {}", e),
        )
            .into_response(),
    }
}

/// Serve OpenAPI specification as YAML
#[utoipa::path(
    get,
    path = "/openapi.yaml",
    tag = "system",
    responses(
        (status = 200, description = "OpenAPI specification in YAML format", content_type = "application/yaml"),
        (status = 500, description = "Failed to generate specification")
    )
)]
async fn serve_openapi_yaml() -> impl IntoResponse {
    match openapi::get_openapi_yaml() {
        Ok(yaml) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/yaml")],
            yaml,
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to generate OpenAPI spec: {}", e),
        )
            .into_response(),
    }
}

/// Logging middleware to log all requests
async fn logging_middleware(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let start = std::time::Instant::now();

    let response = next.run(req).await;

    let elapsed = start.elapsed();
    let status = response.status();

    if status.is_success() {
        info!("{} {} - {} ({:?})", method, uri, status, elapsed);
    } else {
        error!("{} {} - {} ({:?})", method, uri, status, elapsed);
    }

    response
}
