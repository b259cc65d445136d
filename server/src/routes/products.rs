//! Catalog routes.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tote_engine::ProductSnapshot;

use crate::error::Result;
use crate::handlers::handle_product;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/products/{product_id}", get(product_handler))
}

/// GET /products/{product_id} - Display fields for a product.
async fn product_handler(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Json<ProductSnapshot>> {
    let product = handle_product(&state.pool, &product_id).await?;
    Ok(Json(product))
}
