//! OpenAPI documentation and schema generation
//!
//! Defines the OpenAPI specification for the imgbatch REST API using utoipa
//! for compile-time spec generation.

use utoipa::OpenApi;

/// OpenAPI documentation for the imgbatch REST API
///
/// The spec can be accessed via:
/// - `/openapi.json` - JSON format OpenAPI specification
/// - `/swagger-ui` - Interactive Swagger UI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "imgbatch REST API",
        version = "0.1.0",
        description = "Submit images for server-side processing and follow each item's lifecycle",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:6789", description = "Local development server")
    ),
    paths(
        // Items
        crate::api::routes::list_items,
        crate::api::routes::add_items,
        crate::api::routes::get_item,
        crate::api::routes::delete_item,
        crate::api::routes::get_preview,
        crate::api::routes::get_result,

        // Selection
        crate::api::routes::get_selection,
        crate::api::routes::set_selection,

        // System
        crate::api::routes::health_check,
        crate::api::routes::openapi_spec,
        crate::api::routes::event_stream,
    ),
    components(schemas(
        // Core types from types.rs
        crate::types::ItemId,
        crate::types::ItemStatus,
        crate::types::ItemInfo,
        crate::types::RejectReason,
        crate::types::RejectedFile,
        crate::types::AddFilesOutcome,
        crate::types::SelectionInfo,
        crate::types::Event,

        // Resource handles
        crate::registry::ResourceKind,
        crate::registry::ResourceHandle,

        // Config types from config.rs
        crate::config::Config,
        crate::config::ProcessingConfig,
        crate::config::SubmissionConfig,
        crate::config::ServerIntegrationConfig,
        crate::config::ApiConfig,

        // API request/response types
        crate::api::routes::SelectRequest,
        crate::api::routes::HealthResponse,

        // Error types from error.rs
        crate::error::ApiError,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "items", description = "Items - Submit images, follow their status, fetch previews and results"),
        (name = "selection", description = "Selection - The single item currently shown"),
        (name = "system", description = "System endpoints - Health checks, OpenAPI spec, events"),
    )
)]
pub struct ApiDoc;
