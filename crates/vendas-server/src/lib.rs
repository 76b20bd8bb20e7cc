//! Vendas Web Server
//!
//! Axum-based JSON API for the Vendas sales dashboard. Every dashboard request
//! re-runs the fetch → filter → aggregate pipeline against the sales source.
//!
//! Security features:
//! - Read-only API (GET only)
//! - Restrictive CORS policy
//! - Input validation (region, year range, top-N bounds)
//! - Sanitized error responses

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::CorsLayer, services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tracing::{error, info, warn};

use vendas_core::{Config, Error as CoreError, SalesSource};

mod handlers;

/// Shared application state
pub struct AppState {
    pub source: Arc<dyn SalesSource>,
    pub config: Config,
}

/// Server configuration
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

/// Create the application router
pub fn create_router(
    source: Arc<dyn SalesSource>,
    config: Config,
    static_dir: Option<&str>,
    server_config: ServerConfig,
) -> Router {
    let state = Arc::new(AppState { source, config });

    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/regions", get(handlers::list_regions))
        .route("/sellers", get(handlers::list_sellers))
        .route("/dashboard", get(handlers::get_dashboard));

    // Build CORS layer
    let cors = if server_config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods([Method::GET, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    } else {
        let origins: Vec<HeaderValue> = server_config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    };

    let mut app = Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ));

    // Serve static files if directory provided
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}

/// Start the server
pub async fn serve(
    source: Arc<dyn SalesSource>,
    config: Config,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
) -> anyhow::Result<()> {
    serve_with_config(source, config, host, port, static_dir, ServerConfig::default()).await
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    source: Arc<dyn SalesSource>,
    config: Config,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    server_config: ServerConfig,
) -> anyhow::Result<()> {
    if host != "127.0.0.1" && host != "localhost" {
        warn!("⚠️  Listening on {} - the dashboard API has no authentication", host);
    }

    info!("Sales source: {}", source.describe());
    info!("Config: {}", config.source);

    let app = create_router(source, config, static_dir, server_config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn internal(msg: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            internal: None,
        }
    }

    /// Map a core error onto a status code; upstream details stay in the log
    fn from_core(err: CoreError) -> Self {
        match err {
            CoreError::EmptyDataset(filters) => {
                Self::not_found(&format!("No sales found for {}", filters))
            }
            CoreError::InvalidData(msg) => Self::bad_request(&msg),
            err if err.is_upstream() => Self {
                status: StatusCode::BAD_GATEWAY,
                message: "Sales API request failed".to_string(),
                internal: Some(err.into()),
            },
            err => Self {
                internal: Some(err.into()),
                ..Self::internal("An internal error occurred")
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, status = %self.status, "Request failed");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        match err.into().downcast::<CoreError>() {
            Ok(core) => Self::from_core(core),
            Err(err) => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                // Return generic message to client
                message: "An internal error occurred".to_string(),
                // Keep full error for logging
                internal: Some(err),
            },
        }
    }
}

#[cfg(test)]
mod tests;
