//! In-process collaborators.
//!
//! [`MemoryRemote`] and [`StaticCatalog`] stand in for the backend when the
//! engine runs without a network (demos, tests, benchmarks). The remote
//! records every call and can be told to fail, which is how the engine's
//! rollback paths are exercised.

use crate::{
    ProductId, ProductResolver, ProductSnapshot, RemoteCollectionClient, RemoteError, RemoteItem,
    RemoteItemId, ResolveError, UserId,
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// A call received by [`MemoryRemote`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCall {
    FetchAll(UserId),
    AddItem(UserId, ProductId),
    RemoveItem(UserId, RemoteItemId),
}

#[derive(Debug, Default)]
struct RemoteState {
    collections: HashMap<UserId, Vec<RemoteItem>>,
    catalog: HashMap<ProductId, ProductSnapshot>,
    calls: Vec<RemoteCall>,
    next_id: u64,
    latency: Duration,
    offline: bool,
    fail_adds: bool,
    fail_removes: bool,
    fail_removal_of: HashSet<ProductId>,
    reject_auth: bool,
}

impl RemoteState {
    fn fault(&self) -> Option<RemoteError> {
        if self.reject_auth {
            return Some(RemoteError::Auth("session expired".into()));
        }
        if self.offline {
            return Some(RemoteError::Network("connection refused".into()));
        }
        None
    }
}

/// Server collection kept in memory, keyed by user.
#[derive(Debug, Default)]
pub struct MemoryRemote {
    state: Mutex<RemoteState>,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RemoteState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register display fields the server returns for a product.
    pub fn with_product(self, product_id: impl Into<ProductId>, product: ProductSnapshot) -> Self {
        self.lock().catalog.insert(product_id.into(), product);
        self
    }

    /// Put a record into a user's server collection without logging a call.
    pub fn seed(
        &self,
        user: impl Into<UserId>,
        product_id: impl Into<ProductId>,
        product: ProductSnapshot,
    ) -> RemoteItem {
        let mut state = self.lock();
        let product_id = product_id.into();
        state.catalog.insert(product_id.clone(), product.clone());
        state.next_id += 1;
        let record = RemoteItem {
            id: format!("srv-{}", state.next_id),
            product_id,
            product,
            added_at: Utc::now(),
        };
        state
            .collections
            .entry(user.into())
            .or_default()
            .push(record.clone());
        record
    }

    /// The user's server collection.
    pub fn items(&self, user: &str) -> Vec<RemoteItem> {
        self.lock()
            .collections
            .get(user)
            .cloned()
            .unwrap_or_default()
    }

    pub fn calls(&self) -> Vec<RemoteCall> {
        self.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Count `add_item` calls for one product.
    pub fn add_calls_for(&self, product_id: &str) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| matches!(c, RemoteCall::AddItem(_, p) if p == product_id))
            .count()
    }

    /// Delay every call, so tests can overlap operations.
    pub fn set_latency(&self, latency: Duration) {
        self.lock().latency = latency;
    }

    /// Fail every call with a network error.
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    pub fn fail_adds(&self, fail: bool) {
        self.lock().fail_adds = fail;
    }

    pub fn fail_removes(&self, fail: bool) {
        self.lock().fail_removes = fail;
    }

    /// Fail removal of one product only.
    pub fn fail_removal_of(&self, product_id: impl Into<ProductId>) {
        self.lock().fail_removal_of.insert(product_id.into());
    }

    /// Fail every call with an auth error.
    pub fn reject_auth(&self, reject: bool) {
        self.lock().reject_auth = reject;
    }

    async fn delay(&self) {
        let latency = self.lock().latency;
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl RemoteCollectionClient for MemoryRemote {
    async fn fetch_all(&self, user: &UserId) -> Result<Vec<RemoteItem>, RemoteError> {
        self.delay().await;
        let mut state = self.lock();
        state.calls.push(RemoteCall::FetchAll(user.clone()));
        if let Some(err) = state.fault() {
            return Err(err);
        }
        Ok(state.collections.get(user).cloned().unwrap_or_default())
    }

    async fn add_item(
        &self,
        user: &UserId,
        product_id: &ProductId,
    ) -> Result<RemoteItem, RemoteError> {
        self.delay().await;
        let mut state = self.lock();
        state
            .calls
            .push(RemoteCall::AddItem(user.clone(), product_id.clone()));
        if let Some(err) = state.fault() {
            return Err(err);
        }
        if state.fail_adds {
            return Err(RemoteError::Network("add rejected by gateway".into()));
        }

        if let Some(existing) = state
            .collections
            .get(user)
            .and_then(|items| items.iter().find(|i| &i.product_id == product_id))
        {
            return Ok(existing.clone());
        }

        let product = state
            .catalog
            .get(product_id)
            .cloned()
            .unwrap_or_else(|| ProductSnapshot::titled(product_id.clone()));
        state.next_id += 1;
        let record = RemoteItem {
            id: format!("srv-{}", state.next_id),
            product_id: product_id.clone(),
            product,
            added_at: Utc::now(),
        };
        state
            .collections
            .entry(user.clone())
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    async fn remove_item(&self, user: &UserId, item_id: &RemoteItemId) -> Result<(), RemoteError> {
        self.delay().await;
        let mut state = self.lock();
        state
            .calls
            .push(RemoteCall::RemoveItem(user.clone(), item_id.clone()));
        if let Some(err) = state.fault() {
            return Err(err);
        }
        if state.fail_removes {
            return Err(RemoteError::Network("remove timed out".into()));
        }

        let blocked = state
            .collections
            .get(user)
            .and_then(|items| items.iter().find(|i| &i.id == item_id))
            .is_some_and(|i| state.fail_removal_of.contains(&i.product_id));
        if blocked {
            return Err(RemoteError::Network("remove timed out".into()));
        }

        if let Some(items) = state.collections.get_mut(user) {
            items.retain(|i| &i.id != item_id);
        }
        Ok(())
    }
}

/// Fixed product catalog.
#[derive(Debug, Default)]
pub struct StaticCatalog {
    products: HashMap<ProductId, ProductSnapshot>,
    unavailable: AtomicBool,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_product(mut self, product_id: impl Into<ProductId>, product: ProductSnapshot) -> Self {
        self.products.insert(product_id.into(), product);
        self
    }

    /// Make every lookup fail with a network error.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProductResolver for StaticCatalog {
    async fn resolve(&self, product_id: &ProductId) -> Result<ProductSnapshot, ResolveError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ResolveError::Network("catalog offline".into()));
        }
        self.products
            .get(product_id)
            .cloned()
            .ok_or_else(|| ResolveError::NotFound(product_id.clone()))
    }
}
