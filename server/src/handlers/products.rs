//! Catalog handler.

use crate::db;
use crate::error::{AppError, Result};
use sqlx::PgPool;
use tote_engine::ProductSnapshot;

/// Look up display fields for a product.
pub async fn handle_product(pool: &PgPool, product_id: &str) -> Result<ProductSnapshot> {
    db::get_product(pool, product_id)
        .await?
        .map(|p| p.to_snapshot())
        .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))
}
