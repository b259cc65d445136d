//! Database operations for the saved_items table.

use super::products::snapshot_from_columns;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tote_engine::RemoteItem;

/// A saved item joined with its catalog row.
#[derive(Debug)]
pub struct StoredItem {
    pub id: String,
    pub product_id: String,
    pub added_at: DateTime<Utc>,
    pub title: String,
    pub price_minor: Option<i64>,
    pub currency: Option<String>,
    pub image_url: Option<String>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for StoredItem {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(StoredItem {
            id: row.try_get("id")?,
            product_id: row.try_get("product_id")?,
            added_at: row.try_get("added_at")?,
            title: row.try_get("title")?,
            price_minor: row.try_get("price_minor")?,
            currency: row.try_get("currency")?,
            image_url: row.try_get("image_url")?,
        })
    }
}

impl StoredItem {
    /// Convert a database row to the wire record.
    pub fn to_remote_item(&self) -> RemoteItem {
        RemoteItem {
            id: self.id.clone(),
            product_id: self.product_id.clone(),
            product: snapshot_from_columns(
                &self.title,
                self.price_minor,
                self.currency.as_deref(),
                self.image_url.as_deref(),
            ),
            added_at: self.added_at,
        }
    }
}

const SELECT_ITEMS: &str = r#"
    SELECT i.id, i.product_id, i.added_at,
           p.title, p.price_minor, p.currency, p.image_url
    FROM saved_items i
    JOIN products p ON p.product_id = i.product_id
"#;

/// All items of a user in insertion order.
pub async fn list_items(pool: &PgPool, user_id: &str) -> Result<Vec<StoredItem>, sqlx::Error> {
    sqlx::query_as::<_, StoredItem>(&format!(
        "{SELECT_ITEMS} WHERE i.user_id = $1 ORDER BY i.seq"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// The item a user saved for a product, if any.
pub async fn find_item_by_product(
    pool: &PgPool,
    user_id: &str,
    product_id: &str,
) -> Result<Option<StoredItem>, sqlx::Error> {
    sqlx::query_as::<_, StoredItem>(&format!(
        "{SELECT_ITEMS} WHERE i.user_id = $1 AND i.product_id = $2"
    ))
    .bind(user_id)
    .bind(product_id)
    .fetch_optional(pool)
    .await
}

/// Insert an item unless the user already saved the product.
///
/// Returns `true` if a row was created.
pub async fn insert_item(
    pool: &PgPool,
    id: &str,
    user_id: &str,
    product_id: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO saved_items (id, user_id, product_id)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id, product_id) DO NOTHING
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(product_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Delete a user's item. Returns `false` if there was nothing to delete.
pub async fn delete_item(pool: &PgPool, user_id: &str, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM saved_items WHERE user_id = $1 AND id = $2")
        .bind(user_id)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
