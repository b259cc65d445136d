//! Merge of a local collection with an authenticated user's server collection.
//!
//! # Algorithm
//!
//! 1. Index the remote records by `product_id` (first record per product wins)
//! 2. Walk the local items in order; an item the server also holds takes the
//!    server's copy in place, keeping its local handle
//! 3. Local items the server lacks are kept and scheduled for a push, unless
//!    they are tied to another account; those are left out
//! 4. Remote-only records are appended in server order
//!
//! The result never contains two items for one product, and merging the
//! same inputs again yields the same collection.

use crate::{Collection, CollectionItem, ItemId, ProductId, RemoteItem, UserId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// An item that exists only locally and must be sent to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushTarget {
    pub item_id: ItemId,
    pub product_id: ProductId,
}

/// The output of [`merge`].
#[derive(Debug, Clone, PartialEq)]
pub struct MergePlan {
    /// The merged collection, before any push results are applied
    pub merged: Collection,
    /// Local-only items to push, in collection order
    pub to_push: Vec<PushTarget>,
    /// Local items replaced by the server copy
    pub replaced: usize,
    /// Remote-only records pulled in
    pub pulled: usize,
}

/// Summary of a completed merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeReport {
    /// Local items whose server copy took precedence
    pub replaced: usize,
    /// Items that only existed on the server
    pub pulled: usize,
    /// Local-only items the server accepted
    pub pushed: Vec<ProductId>,
    /// Local-only items the server did not accept; retried on next merge
    pub pending: Vec<ProductId>,
}

impl MergeReport {
    pub fn is_partial(&self) -> bool {
        !self.pending.is_empty()
    }
}

/// Merge `local` with `remote`. Remote records win on conflict.
pub fn merge(local: &Collection, remote: &[RemoteItem], owner: &UserId) -> MergePlan {
    let mut by_product: HashMap<&str, &RemoteItem> = HashMap::with_capacity(remote.len());
    for record in remote {
        if by_product.contains_key(record.product_id.as_str()) {
            debug!(product_id = %record.product_id, "ignoring duplicate remote record");
            continue;
        }
        by_product.insert(record.product_id.as_str(), record);
    }

    let mut merged = Collection::new();
    let mut to_push = Vec::new();
    let mut replaced = 0;
    let mut claimed: HashSet<&str> = HashSet::with_capacity(local.len());

    for item in local.iter() {
        let mut item = item.clone();
        match by_product.get(item.product_id.as_str()) {
            Some(record) => {
                item.adopt_remote(record, owner);
                claimed.insert(record.product_id.as_str());
                replaced += 1;
            }
            None if item.is_owned_by_other(owner) => {
                debug!(product_id = %item.product_id, "leaving out item of another account");
                continue;
            }
            None => to_push.push(PushTarget {
                item_id: item.id.clone(),
                product_id: item.product_id.clone(),
            }),
        }
        if let Err(e) = merged.insert(item) {
            debug!(error = %e, "skipping duplicate local item");
        }
    }

    let mut pulled = 0;
    for record in remote {
        let product = record.product_id.as_str();
        if claimed.contains(product) || merged.contains_product(product) {
            continue;
        }
        if merged
            .insert(CollectionItem::from_remote(record, owner))
            .is_ok()
        {
            pulled += 1;
        }
    }

    MergePlan {
        merged,
        to_push,
        replaced,
        pulled,
    }
}
