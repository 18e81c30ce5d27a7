//! Item handlers: submission, listing, removal and resource download.

use crate::api::AppState;
use crate::error::{ApiError, Error, ItemError};
use crate::processor::FILE_FIELD;
use crate::registry::Resource;
use crate::types::{ItemId, ItemInfo, SourceFile};
use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

/// Fallback name for uploads that carry no file name
const UNNAMED_UPLOAD: &str = "upload";

/// GET /items - List all items in submission order
#[utoipa::path(
    get,
    path = "/items",
    tag = "items",
    responses(
        (status = 200, description = "All items, oldest first", body = Vec<ItemInfo>)
    )
)]
pub async fn list_items(State(state): State<AppState>) -> Json<Vec<ItemInfo>> {
    Json(state.manager.items())
}

/// POST /items - Submit images (multipart/form-data)
///
/// Every `file` field is one submission. Non-image parts are reported in
/// `rejected` and do not become items.
#[utoipa::path(
    post,
    path = "/items",
    tag = "items",
    request_body(content = Vec<u8>, description = "One or more `file` parts (multipart/form-data)", content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Files accepted for processing", body = crate::types::AddFilesOutcome),
        (status = 400, description = "No `file` field or malformed multipart body", body = ApiError),
        (status = 503, description = "Manager is shutting down", body = ApiError)
    )
)]
pub async fn add_items(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let mut files = Vec::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return (
                    e.status(),
                    Json(ApiError::new("invalid_multipart", e.body_text())),
                )
                    .into_response();
            }
        };

        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let name = field.file_name().unwrap_or(UNNAMED_UPLOAD).to_string();
        let content_type = field.content_type().map(str::to_string);
        match field.bytes().await {
            Ok(bytes) => files.push(SourceFile::new(name, content_type, bytes)),
            Err(e) => {
                return (
                    e.status(),
                    Json(ApiError::new(
                        "invalid_file",
                        format!("Failed to read file '{}': {}", name, e.body_text()),
                    )),
                )
                    .into_response();
            }
        }
    }

    if files.is_empty() {
        return ApiError::new(
            "missing_file",
            format!("No file provided in '{}' field", FILE_FIELD),
        )
        .into_response();
    }

    match state.manager.add_files(files).await {
        Ok(outcome) => (StatusCode::CREATED, Json(outcome)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// GET /items/:id - Get one item
#[utoipa::path(
    get,
    path = "/items/{id}",
    tag = "items",
    params(
        ("id" = u64, Path, description = "Item ID")
    ),
    responses(
        (status = 200, description = "Item snapshot", body = ItemInfo),
        (status = 404, description = "Item not found", body = ApiError)
    )
)]
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<ItemId>,
) -> Result<Json<ItemInfo>, Error> {
    state.manager.item(id).map(Json)
}

/// DELETE /items/:id - Remove an item and release its resources
///
/// An in-flight upload is not cancelled; its outcome is discarded.
#[utoipa::path(
    delete,
    path = "/items/{id}",
    tag = "items",
    params(
        ("id" = u64, Path, description = "Item ID")
    ),
    responses(
        (status = 204, description = "Item removed"),
        (status = 404, description = "Item not found", body = ApiError)
    )
)]
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<ItemId>,
) -> Result<StatusCode, Error> {
    match state.manager.remove_item(id) {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err(ItemError::NotFound { id }.into()),
    }
}

/// GET /items/:id/preview - Original image bytes
#[utoipa::path(
    get,
    path = "/items/{id}/preview",
    tag = "items",
    params(
        ("id" = u64, Path, description = "Item ID")
    ),
    responses(
        (status = 200, description = "Original image", content_type = "image/*"),
        (status = 404, description = "Item not found", body = ApiError)
    )
)]
pub async fn get_preview(
    State(state): State<AppState>,
    Path(id): Path<ItemId>,
) -> Result<Response, Error> {
    state.manager.preview(id).map(resource_response)
}

/// GET /items/:id/result - Processed image bytes
#[utoipa::path(
    get,
    path = "/items/{id}/result",
    tag = "items",
    params(
        ("id" = u64, Path, description = "Item ID")
    ),
    responses(
        (status = 200, description = "Processed image", content_type = "image/*"),
        (status = 404, description = "Item not found", body = ApiError),
        (status = 409, description = "Item is still loading or failed", body = ApiError)
    )
)]
pub async fn get_result(
    State(state): State<AppState>,
    Path(id): Path<ItemId>,
) -> Result<Response, Error> {
    state.manager.result(id).map(resource_response)
}

fn resource_response(resource: Resource) -> Response {
    let content_type = resource
        .content_type
        .unwrap_or_else(|| "application/octet-stream".to_string());

    ([(header::CONTENT_TYPE, content_type)], resource.bytes).into_response()
}
