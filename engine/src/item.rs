//! Saved-item types.

use crate::{ItemId, ProductId, RemoteItemId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Price in minor currency units (cents) to avoid float drift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    pub amount_minor: i64,
    pub currency: String,
}

impl Price {
    pub fn new(amount_minor: i64, currency: impl Into<String>) -> Self {
        Self {
            amount_minor,
            currency: currency.into(),
        }
    }
}

/// Denormalized display fields for a catalog product.
///
/// Captured once when the item is saved. Stale copies are tolerated; the
/// next merge with the server refreshes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl ProductSnapshot {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            price: None,
            image: None,
        }
    }

    pub fn with_price(mut self, price: Price) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// A saved-item record as the server stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteItem {
    /// Server-assigned identifier
    pub id: RemoteItemId,
    pub product_id: ProductId,
    pub product: ProductSnapshot,
    pub added_at: DateTime<Utc>,
}

/// One saved product reference in the local collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionItem {
    /// Client-local handle, never sent to the server
    pub id: ItemId,
    /// De-duplication key
    pub product_id: ProductId,
    pub product: ProductSnapshot,
    pub added_at: DateTime<Utc>,
    /// Identity that owned the collection when this item was saved or pulled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_hint: Option<UserId>,
    /// Matching server record, once the server has confirmed it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_id: Option<RemoteItemId>,
    /// A remote add for this item failed and has not been retried successfully
    #[serde(default)]
    pub pending_push: bool,
}

impl CollectionItem {
    /// Create a freshly saved item with a new local handle.
    pub fn new(
        product_id: impl Into<ProductId>,
        product: ProductSnapshot,
        owner_hint: Option<UserId>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            product_id: product_id.into(),
            product,
            added_at: Utc::now(),
            owner_hint,
            remote_id: None,
            pending_push: false,
        }
    }

    /// Create a local item for a record that only exists on the server.
    pub fn from_remote(remote: &RemoteItem, owner: &UserId) -> Self {
        let mut item = Self::new(remote.product_id.clone(), remote.product.clone(), None);
        item.adopt_remote(remote, owner);
        item
    }

    /// Take the server's copy as authoritative, keeping the local handle.
    pub fn adopt_remote(&mut self, remote: &RemoteItem, owner: &UserId) {
        self.product = remote.product.clone();
        self.added_at = remote.added_at;
        self.remote_id = Some(remote.id.clone());
        self.owner_hint = Some(owner.clone());
        self.pending_push = false;
    }

    /// Whether the server is known to hold this item.
    pub fn is_synced(&self) -> bool {
        self.remote_id.is_some() && !self.pending_push
    }

    /// Items tied to an account, whether or not its server confirmed them.
    pub fn is_owned(&self) -> bool {
        self.owner_hint.is_some()
    }

    /// Items tied to an account other than `user`.
    pub fn is_owned_by_other(&self, user: &UserId) -> bool {
        self.owner_hint.as_ref().is_some_and(|owner| owner != user)
    }
}
