//! Catalog lookups.

use sqlx::{PgPool, Row};
use tote_engine::{Price, ProductSnapshot};

/// A catalog row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredProduct {
    pub title: String,
    pub price_minor: Option<i64>,
    pub currency: Option<String>,
    pub image_url: Option<String>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for StoredProduct {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(StoredProduct {
            title: row.try_get("title")?,
            price_minor: row.try_get("price_minor")?,
            currency: row.try_get("currency")?,
            image_url: row.try_get("image_url")?,
        })
    }
}

impl StoredProduct {
    pub fn to_snapshot(&self) -> ProductSnapshot {
        snapshot_from_columns(
            &self.title,
            self.price_minor,
            self.currency.as_deref(),
            self.image_url.as_deref(),
        )
    }
}

/// Build display fields from catalog columns. A price needs both amount and
/// currency.
pub fn snapshot_from_columns(
    title: &str,
    price_minor: Option<i64>,
    currency: Option<&str>,
    image_url: Option<&str>,
) -> ProductSnapshot {
    let mut snapshot = ProductSnapshot::titled(title);
    if let (Some(amount), Some(currency)) = (price_minor, currency) {
        snapshot = snapshot.with_price(Price::new(amount, currency));
    }
    if let Some(image) = image_url {
        snapshot = snapshot.with_image(image);
    }
    snapshot
}

/// Get a product by id.
pub async fn get_product(
    pool: &PgPool,
    product_id: &str,
) -> Result<Option<StoredProduct>, sqlx::Error> {
    sqlx::query_as::<_, StoredProduct>(
        r#"
        SELECT title, price_minor, currency, image_url
        FROM products
        WHERE product_id = $1
        "#,
    )
    .bind(product_id)
    .fetch_optional(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_requires_currency() {
        let snapshot = snapshot_from_columns("Lamp", Some(1999), None, None);
        assert_eq!(snapshot.price, None);

        let snapshot = snapshot_from_columns("Lamp", Some(1999), Some("EUR"), Some("/lamp.png"));
        assert_eq!(snapshot.price, Some(Price::new(1999, "EUR")));
        assert_eq!(snapshot.image.as_deref(), Some("/lamp.png"));
    }
}
