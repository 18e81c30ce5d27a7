//! REST API server module
//!
//! Exposes the submission manager over HTTP: upload images, observe items and
//! their results, drive the selection, and stream lifecycle events.

use crate::{Config, Result, SubmissionManager};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::get,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod error_response;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use state::AppState;

/// Create the API router with all route definitions
///
/// # Routes
///
/// ## Items
/// - `GET /items` - List all items
/// - `POST /items` - Submit images (multipart, one `file` part per image)
/// - `GET /items/:id` - Get single item
/// - `DELETE /items/:id` - Remove item and release its resources
/// - `GET /items/:id/preview` - Original image bytes
/// - `GET /items/:id/result` - Processed image bytes
///
/// ## Selection
/// - `GET /selection` - Current selection
/// - `PUT /selection` - Select an item
///
/// ## System
/// - `GET /health` - Health check
/// - `GET /openapi.json` - OpenAPI specification
/// - `GET /swagger-ui` - Interactive Swagger UI documentation (if enabled)
/// - `GET /events` - Server-sent events stream
pub fn create_router(manager: SubmissionManager, config: Arc<Config>) -> Router {
    let state = AppState::new(manager, config.clone());

    let router = Router::new()
        // Items
        .route("/items", get(routes::list_items).post(routes::add_items))
        .route("/items/:id", get(routes::get_item).delete(routes::delete_item))
        .route("/items/:id/preview", get(routes::get_preview))
        .route("/items/:id/result", get(routes::get_result))
        // Selection
        .route(
            "/selection",
            get(routes::get_selection).put(routes::set_selection),
        )
        // System
        .route("/health", get(routes::health_check))
        .route("/openapi.json", get(routes::openapi_spec))
        .route("/events", get(routes::event_stream))
        .fallback(routes::route_not_found);

    // SwaggerUi serves its own copy of the spec, so it must not reuse /openapi.json
    let router = if config.server.api.swagger_ui {
        router.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
    } else {
        router
    };

    let router = router
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.server.api.max_upload_bytes))
        .layer(TraceLayer::new_for_http());

    if config.server.api.cors_enabled {
        let cors = build_cors_layer(&config.server.api.cors_origins);
        router.layer(cors)
    } else {
        router
    }
}

/// Build a CORS layer based on configured origins
///
/// `"*"` (or an empty list) allows any origin; otherwise only the listed
/// origins that parse as header values are allowed.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let allow_any = origins.iter().any(|o| o == "*");

    let cors = if allow_any || origins.is_empty() {
        CorsLayer::new().allow_origin(Any)
    } else {
        let allowed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|o| match o.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %o, "Ignoring unparseable CORS origin");
                    None
                }
            })
            .collect();
        CorsLayer::new().allow_origin(AllowOrigin::list(allowed))
    };

    cors.allow_methods(Any).allow_headers(Any)
}

/// Start the API server on the configured bind address
///
/// Runs until the server stops, either due to an error or because the task
/// driving it is dropped.
///
/// # Example
///
/// ```no_run
/// use imgbatch::{Config, SubmissionManager};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Arc::new(Config::default());
/// let manager = SubmissionManager::new((*config).clone())?;
///
/// imgbatch::api::start_api_server(manager, config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_api_server(manager: SubmissionManager, config: Arc<Config>) -> Result<()> {
    let bind_address = config.server.api.bind_address;

    tracing::info!(address = %bind_address, "Starting API server");

    let app = create_router(manager, config);

    let listener = TcpListener::bind(bind_address)
        .await
        .map_err(crate::error::Error::Io)?;

    tracing::info!(
        address = %listener.local_addr().unwrap_or(bind_address),
        "API server listening"
    );

    axum::serve(listener, app)
        .await
        .map_err(|e| crate::error::Error::ApiServerError(e.to_string()))?;

    tracing::info!("API server stopped");
    Ok(())
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
