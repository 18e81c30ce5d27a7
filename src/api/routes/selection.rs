//! Selection handlers.

use super::SelectRequest;
use crate::api::AppState;
use crate::types::SelectionInfo;
use axum::{Json, extract::State};

/// GET /selection - Currently selected item
#[utoipa::path(
    get,
    path = "/selection",
    tag = "selection",
    responses(
        (status = 200, description = "Current selection", body = SelectionInfo)
    )
)]
pub async fn get_selection(State(state): State<AppState>) -> Json<SelectionInfo> {
    Json(state.manager.selected_item())
}

/// PUT /selection - Select an item
///
/// The id is not validated; selecting an unknown id leaves `item` empty until
/// the next change to the item list picks a present item.
#[utoipa::path(
    put,
    path = "/selection",
    tag = "selection",
    request_body = SelectRequest,
    responses(
        (status = 200, description = "Selection after the change", body = SelectionInfo)
    )
)]
pub async fn set_selection(
    State(state): State<AppState>,
    Json(request): Json<SelectRequest>,
) -> Json<SelectionInfo> {
    state.manager.select(request.id);
    Json(state.manager.selected_item())
}
