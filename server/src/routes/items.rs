//! Per-user collection routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use tote_engine::RemoteItem;

use crate::auth::AuthUser;
use crate::error::Result;
use crate::handlers::{handle_add, handle_list, handle_remove, AddItemRequest};
use crate::AppState;

/// Create collection routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users/{user_id}/items", get(list_handler).post(add_handler))
        .route("/users/{user_id}/items/{item_id}", delete(remove_handler))
}

/// GET /users/{user_id}/items - List the collection.
async fn list_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<RemoteItem>>> {
    auth.authorize(&user_id)?;
    let items = handle_list(&state.pool, &user_id).await?;
    Ok(Json(items))
}

/// POST /users/{user_id}/items - Save a product.
async fn add_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<String>,
    Json(request): Json<AddItemRequest>,
) -> Result<(StatusCode, Json<RemoteItem>)> {
    auth.authorize(&user_id)?;
    let added = handle_add(&state.pool, &user_id, request).await?;
    let status = if added.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(added.item)))
}

/// DELETE /users/{user_id}/items/{item_id} - Remove an item.
async fn remove_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((user_id, item_id)): Path<(String, String)>,
) -> Result<StatusCode> {
    auth.authorize(&user_id)?;
    handle_remove(&state.pool, &user_id, &item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
