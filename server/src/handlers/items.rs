//! Saved-item handlers - a user's collection on the server.

use crate::db;
use crate::error::{AppError, Result};
use serde::Deserialize;
use sqlx::PgPool;
use tote_engine::RemoteItem;
use uuid::Uuid;

/// Request body for adding an item.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub product_id: String,
}

/// Outcome of an add: adding a saved product returns the existing record.
#[derive(Debug)]
pub struct AddedItem {
    pub item: RemoteItem,
    pub created: bool,
}

/// List a user's collection in insertion order.
pub async fn handle_list(pool: &PgPool, user_id: &str) -> Result<Vec<RemoteItem>> {
    let items = db::list_items(pool, user_id).await?;
    Ok(items.iter().map(db::StoredItem::to_remote_item).collect())
}

/// Save a product for a user.
pub async fn handle_add(pool: &PgPool, user_id: &str, request: AddItemRequest) -> Result<AddedItem> {
    let product_id = request.product_id.trim();
    if product_id.is_empty() {
        return Err(AppError::BadRequest("productId must not be empty".to_string()));
    }

    if db::get_product(pool, product_id).await?.is_none() {
        return Err(AppError::NotFound(format!("product {product_id}")));
    }

    let id = Uuid::new_v4().to_string();
    let created = db::insert_item(pool, &id, user_id, product_id).await?;

    // A concurrent delete can remove the row between insert and read.
    let stored = db::find_item_by_product(pool, user_id, product_id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("saved item for {product_id} vanished")))?;

    if created {
        tracing::debug!(%user_id, %product_id, item_id = %stored.id, "item saved");
    } else {
        tracing::debug!(%user_id, %product_id, "product already saved");
    }

    Ok(AddedItem {
        item: stored.to_remote_item(),
        created,
    })
}

/// Delete one of a user's items.
pub async fn handle_remove(pool: &PgPool, user_id: &str, item_id: &str) -> Result<()> {
    if db::delete_item(pool, user_id, item_id).await? {
        tracing::debug!(%user_id, %item_id, "item removed");
        Ok(())
    } else {
        Err(AppError::NotFound(format!("item {item_id}")))
    }
}
