//! The reconciliation engine.
//!
//! [`SyncEngine`] owns the canonical in-memory collection and is the only
//! writer of the snapshot store. Local state changes synchronously (and is
//! persisted) before any network call; the remote call is the asynchronous
//! tail of each operation.
//!
//! # Concurrency
//!
//! - The in-memory state sits behind a `std::sync::Mutex` that is never held
//!   across an `.await`.
//! - Add, remove and clear take the mutation guard with `try_lock`. A call
//!   arriving while another mutation's tail is pending fails with
//!   [`Error::Busy`] instead of acting on a stale collection.
//! - Merges wait for the mutation guard and hold it until done. A merge
//!   requested while one is already running is coalesced into a no-op.
//!
//! # Failure policy
//!
//! | operation | network failure |
//! |-----------|-----------------|
//! | merge     | keep local collection, report [`MergeOutcome::Offline`] |
//! | add       | keep item, flag it pending, return a warning |
//! | remove    | roll back, return the error |
//! | clear     | roll back everything, return [`Error::ClearFailed`] |

use crate::identity::{AuthObserver, Identity, IdentityTransition};
use crate::merge::{self, MergeReport};
use crate::{
    error::Result, Collection, CollectionItem, Error, ItemFailure, ProductId, ProductResolver,
    RemoteCollectionClient, RemoteError, ResolveError, SnapshotStore, Transaction,
};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Engine lifecycle state. There is no terminal state.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineState {
    Uninitialized,
    Ready(Collection),
    /// A merge or bulk operation is in flight
    Syncing(Collection),
    /// The last sync-affecting operation failed; the collection is still usable
    Error {
        message: String,
        last_known_good: Collection,
    },
}

impl EngineState {
    pub fn collection(&self) -> Option<&Collection> {
        match self {
            EngineState::Uninitialized => None,
            EngineState::Ready(c) | EngineState::Syncing(c) => Some(c),
            EngineState::Error {
                last_known_good, ..
            } => Some(last_known_good),
        }
    }

    fn collection_mut(&mut self) -> Option<&mut Collection> {
        match self {
            EngineState::Uninitialized => None,
            EngineState::Ready(c) | EngineState::Syncing(c) => Some(c),
            EngineState::Error {
                last_known_good, ..
            } => Some(last_known_good),
        }
    }

    fn take_collection(&mut self) -> Option<Collection> {
        match std::mem::replace(self, EngineState::Uninitialized) {
            EngineState::Uninitialized => None,
            EngineState::Ready(c) | EngineState::Syncing(c) => Some(c),
            EngineState::Error {
                last_known_good, ..
            } => Some(last_known_good),
        }
    }

    pub fn status(&self) -> EngineStatus {
        match self {
            EngineState::Uninitialized => EngineStatus::Uninitialized,
            EngineState::Ready(_) => EngineStatus::Ready,
            EngineState::Syncing(_) => EngineStatus::Syncing,
            EngineState::Error { message, .. } => EngineStatus::Error(message.clone()),
        }
    }
}

/// [`EngineState`] without the collection, for cheap polling by the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "message", rename_all = "camelCase")]
pub enum EngineStatus {
    Uninitialized,
    Ready,
    Syncing,
    Error(String),
}

/// What a merge request did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Nothing to merge: the session is anonymous
    Skipped,
    Merged(MergeReport),
    /// The server was unreachable; the local collection stays as it was
    Offline { reason: String },
    /// Another merge was already running
    Coalesced,
    /// The identity changed while fetching; the result was discarded
    Superseded,
}

/// Result of a successful add.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddOutcome {
    pub item: CollectionItem,
    /// The server did not accept the item; it stays saved locally
    pub warning: Option<Error>,
}

struct Inner {
    state: EngineState,
    identity: Identity,
}

impl Inner {
    fn collection(&self) -> Result<&Collection> {
        self.state.collection().ok_or(Error::NotInitialized)
    }

    fn collection_mut(&mut self) -> Result<&mut Collection> {
        self.state.collection_mut().ok_or(Error::NotInitialized)
    }

    fn begin_sync(&mut self) {
        if let Some(c) = self.state.take_collection() {
            self.state = EngineState::Syncing(c);
        }
    }

    /// Leave `Syncing`/`Error` for `Ready`, or record a failure.
    ///
    /// While signed in, items still waiting for a push keep the engine in a
    /// partially synced error.
    fn settle(&mut self, error: Option<String>) {
        let Some(collection) = self.state.take_collection() else {
            return;
        };
        let pending = collection.unsynced().len();
        let error = error.or_else(|| {
            (self.identity.is_authenticated() && pending > 0)
                .then(|| partially_synced(pending))
        });
        self.state = match error {
            None => EngineState::Ready(collection),
            Some(message) => {
                debug!(%message, "engine entering error state");
                EngineState::Error {
                    message,
                    last_known_good: collection,
                }
            }
        };
    }
}

fn partially_synced(pending: usize) -> String {
    format!("partially synced: {pending} item(s) pending")
}

/// Resets the merge flag when a merge ends, however it ends.
struct MergeFlag<'a>(&'a AtomicBool);

impl Drop for MergeFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Local/remote synchronization engine for one saved-item collection.
pub struct SyncEngine {
    inner: Mutex<Inner>,
    store: Arc<dyn SnapshotStore>,
    remote: Arc<dyn RemoteCollectionClient>,
    resolver: Arc<dyn ProductResolver>,
    auth_observer: Option<Arc<dyn AuthObserver>>,
    mutation_guard: tokio::sync::Mutex<()>,
    merging: AtomicBool,
}

impl SyncEngine {
    /// Create an engine for `identity`. Call [`SyncEngine::bootstrap`] next.
    pub fn new(
        identity: Identity,
        store: Arc<dyn SnapshotStore>,
        remote: Arc<dyn RemoteCollectionClient>,
        resolver: Arc<dyn ProductResolver>,
    ) -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: EngineState::Uninitialized,
                identity,
            }),
            store,
            remote,
            resolver,
            auth_observer: None,
            mutation_guard: tokio::sync::Mutex::new(()),
            merging: AtomicBool::new(false),
        }
    }

    /// Report server auth rejections to `observer`.
    pub fn with_auth_observer(mut self, observer: Arc<dyn AuthObserver>) -> Self {
        self.auth_observer = Some(observer);
        self
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn report_auth(&self, reason: &str) {
        warn!(reason, "server rejected credentials");
        if let Some(observer) = &self.auth_observer {
            observer.on_auth_rejected(reason);
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Current items in display order. Empty before bootstrap.
    pub fn items(&self) -> Vec<CollectionItem> {
        self.lock()
            .state
            .collection()
            .map(|c| c.items().to_vec())
            .unwrap_or_default()
    }

    pub fn count(&self) -> usize {
        self.lock().state.collection().map_or(0, Collection::len)
    }

    /// Whether a merge or bulk operation is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self.lock().state, EngineState::Syncing(_))
    }

    pub fn last_error(&self) -> Option<String> {
        match &self.lock().state {
            EngineState::Error { message, .. } => Some(message.clone()),
            _ => None,
        }
    }

    pub fn status(&self) -> EngineStatus {
        self.lock().state.status()
    }

    /// Full state, including a copy of the collection.
    pub fn state(&self) -> EngineState {
        self.lock().state.clone()
    }

    pub fn identity(&self) -> Identity {
        self.lock().identity.clone()
    }

    /// Pure membership check; never performs I/O.
    pub fn is_in_collection(&self, product_id: &str) -> bool {
        self.lock()
            .state
            .collection()
            .is_some_and(|c| c.contains_product(product_id))
    }

    /// Number of items the server has not confirmed.
    pub fn unsynced_count(&self) -> usize {
        self.lock()
            .state
            .collection()
            .map_or(0, |c| c.unsynced().len())
    }

    pub fn is_partially_synced(&self) -> bool {
        self.unsynced_count() > 0
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Load the persisted snapshot and, when authenticated, merge with the
    /// server. A second call is a no-op.
    pub async fn bootstrap(&self) -> Result<MergeOutcome> {
        let authenticated = {
            let mut inner = self.lock();
            if !matches!(inner.state, EngineState::Uninitialized) {
                debug!("bootstrap on initialized engine ignored");
                return Ok(MergeOutcome::Skipped);
            }

            let (collection, dropped) = Collection::repair(self.store.load());
            if dropped > 0 {
                warn!(dropped, "removed duplicate products from stored snapshot");
                self.store.save(&collection);
            }
            info!(items = collection.len(), "collection loaded");
            inner.state = EngineState::Ready(collection);
            inner.identity.is_authenticated()
        };

        if authenticated {
            self.run_merge().await
        } else {
            Ok(MergeOutcome::Skipped)
        }
    }

    /// Force a fresh fetch and merge with the server.
    ///
    /// Items whose earlier push failed are pushed again.
    pub async fn refresh(&self) -> Result<MergeOutcome> {
        let uninitialized = matches!(self.lock().state, EngineState::Uninitialized);
        if uninitialized {
            return self.bootstrap().await;
        }
        self.run_merge().await
    }

    /// Apply an identity change.
    ///
    /// Signing in (or switching users) runs the merge protocol. Leaving an
    /// account reverts to an anonymous-only view: every item tied to an
    /// account is dropped, confirmed or not, and anonymous items stay.
    pub async fn set_identity(&self, identity: Identity) -> Result<MergeOutcome> {
        let (transition, initialized) = {
            let mut inner = self.lock();
            let transition = IdentityTransition::between(&inner.identity, &identity);
            inner.identity = identity;
            let initialized = !matches!(inner.state, EngineState::Uninitialized);
            (transition, initialized)
        };
        debug!(?transition, "identity changed");

        if !initialized {
            return Ok(MergeOutcome::Skipped);
        }

        if let Some(user) = transition.departing() {
            let _guard = self.mutation_guard.lock().await;
            let mut inner = self.lock();
            let collection = inner.collection_mut()?;
            let dropped = collection.retain(|item| !item.is_owned());
            self.store.save(collection);
            inner.settle(None);
            info!(user = %user, dropped, "signed out; reverted to anonymous view");
        }

        if transition.triggers_merge() {
            self.run_merge().await
        } else {
            Ok(MergeOutcome::Skipped)
        }
    }

    /// Forward identity updates from an auth collaborator until its channel closes.
    pub async fn follow(self: Arc<Self>, mut identities: watch::Receiver<Identity>) {
        while identities.changed().await.is_ok() {
            let identity = identities.borrow_and_update().clone();
            match self.set_identity(identity).await {
                Ok(outcome) => debug!(?outcome, "identity change applied"),
                Err(e) => warn!(error = %e, "identity change failed"),
            }
        }
        debug!("identity source closed");
    }

    // ------------------------------------------------------------------
    // Merge protocol
    // ------------------------------------------------------------------

    async fn run_merge(&self) -> Result<MergeOutcome> {
        if self.merging.swap(true, Ordering::AcqRel) {
            debug!("merge already in flight; coalescing");
            return Ok(MergeOutcome::Coalesced);
        }
        let _flag = MergeFlag(&self.merging);
        let _guard = self.mutation_guard.lock().await;

        let user = {
            let mut inner = self.lock();
            inner.collection()?;
            let Some(user) = inner.identity.user().cloned() else {
                return Ok(MergeOutcome::Skipped);
            };
            inner.begin_sync();
            user
        };
        info!(user = %user, "merge started");

        let remote = match self.remote.fetch_all(&user).await {
            Ok(remote) => remote,
            Err(RemoteError::Network(reason)) => {
                warn!(%reason, "merge aborted; staying on local collection");
                self.lock()
                    .settle(Some(format!("sync unavailable: {reason}")));
                return Ok(MergeOutcome::Offline { reason });
            }
            Err(RemoteError::Auth(reason)) => {
                self.lock()
                    .settle(Some(format!("authentication rejected: {reason}")));
                self.report_auth(&reason);
                return Err(Error::Auth(reason));
            }
        };

        let plan = {
            let mut inner = self.lock();
            if inner.identity.user() != Some(&user) {
                inner.settle(None);
                info!(user = %user, "identity changed during merge; result discarded");
                return Ok(MergeOutcome::Superseded);
            }
            let collection = inner.collection_mut()?;
            let plan = merge::merge(collection, &remote, &user);
            *collection = plan.merged.clone();
            self.store.save(collection);
            plan
        };

        let mut report = MergeReport {
            replaced: plan.replaced,
            pulled: plan.pulled,
            ..MergeReport::default()
        };
        let mut auth_failure = None;

        for target in &plan.to_push {
            if auth_failure.is_some() {
                report.pending.push(target.product_id.clone());
                self.mark_pending(&target.item_id);
                continue;
            }
            match self.remote.add_item(&user, &target.product_id).await {
                Ok(record) => {
                    let mut inner = self.lock();
                    if let Some(item) = inner.collection_mut()?.get_mut(&target.item_id) {
                        item.adopt_remote(&record, &user);
                    }
                    report.pushed.push(target.product_id.clone());
                }
                Err(err) => {
                    warn!(product_id = %target.product_id, error = %err, "push failed; item kept locally");
                    self.mark_pending(&target.item_id);
                    report.pending.push(target.product_id.clone());
                    if let RemoteError::Auth(reason) = err {
                        auth_failure = Some(reason);
                    }
                }
            }
        }

        {
            let mut inner = self.lock();
            self.store.save(inner.collection()?);
            inner.settle(None);
        }
        info!(
            replaced = report.replaced,
            pulled = report.pulled,
            pushed = report.pushed.len(),
            pending = report.pending.len(),
            "merge finished"
        );

        if let Some(reason) = auth_failure {
            self.report_auth(&reason);
            return Err(Error::Auth(reason));
        }
        Ok(MergeOutcome::Merged(report))
    }

    fn mark_pending(&self, item_id: &str) {
        let mut inner = self.lock();
        if let Ok(collection) = inner.collection_mut() {
            if let Some(item) = collection.get_mut(item_id) {
                item.pending_push = true;
            }
        }
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Save a product.
    ///
    /// The item is committed locally before the server is asked. A server
    /// failure does not undo the add; it comes back as
    /// [`AddOutcome::warning`] and the item is pushed again on the next merge.
    pub async fn add_item(&self, product_id: impl Into<ProductId>) -> Result<AddOutcome> {
        let product_id = product_id.into();
        let _guard = self.mutation_guard.try_lock().map_err(|_| Error::Busy)?;

        let identity = {
            let inner = self.lock();
            if inner.collection()?.contains_product(&product_id) {
                return Err(Error::AlreadyExists(product_id));
            }
            inner.identity.clone()
        };

        let product = self
            .resolver
            .resolve(&product_id)
            .await
            .map_err(|e| match e {
                ResolveError::NotFound(id) => Error::ProductNotFound(id),
                ResolveError::Network(msg) => Error::Resolver(msg),
            })?;

        let item = CollectionItem::new(product_id.clone(), product, identity.user().cloned());
        let item_id = item.id.clone();
        {
            let mut inner = self.lock();
            let collection = inner.collection_mut()?;
            let tx = Transaction::begin("add", collection);
            tx.apply(collection, |c| c.insert(item))?;
            self.store.save(collection);
            tx.commit();
        }
        debug!(product_id = %product_id, "item saved locally");

        let Some(user) = identity.user() else {
            let mut inner = self.lock();
            inner.settle(None);
            let item = inner.collection()?.get(&item_id).cloned();
            return item
                .map(|item| AddOutcome {
                    item,
                    warning: None,
                })
                .ok_or(Error::NotFound(item_id));
        };

        let warning = match self.remote.add_item(user, &product_id).await {
            Ok(record) => {
                let mut inner = self.lock();
                if let Some(saved) = inner.collection_mut()?.get_mut(&item_id) {
                    saved.adopt_remote(&record, user);
                }
                self.store.save(inner.collection()?);
                inner.settle(None);
                None
            }
            Err(err) => {
                warn!(product_id = %product_id, error = %err, "remote add failed; item kept locally");
                {
                    let mut inner = self.lock();
                    if let Some(saved) = inner.collection_mut()?.get_mut(&item_id) {
                        saved.pending_push = true;
                    }
                    self.store.save(inner.collection()?);
                    inner.settle(Some(format!("saved locally only: {err}")));
                }
                if let RemoteError::Auth(reason) = &err {
                    self.report_auth(reason);
                }
                Some(Error::from(err))
            }
        };

        let item = self.lock().collection()?.get(&item_id).cloned();
        item.map(|item| AddOutcome { item, warning })
            .ok_or(Error::NotFound(item_id))
    }

    /// Remove an item by its local handle.
    ///
    /// The item disappears immediately. If the server refuses the removal it
    /// is put back at its original position and the error is returned.
    pub async fn remove_item(&self, item_id: &str) -> Result<CollectionItem> {
        let _guard = self.mutation_guard.try_lock().map_err(|_| Error::Busy)?;

        let (tx, removed, identity) = {
            let mut inner = self.lock();
            let identity = inner.identity.clone();
            let collection = inner.collection_mut()?;
            let tx = Transaction::begin("remove", collection);
            let (_, removed) = tx.apply(collection, |c| {
                c.remove(item_id)
                    .ok_or_else(|| Error::NotFound(item_id.to_string()))
            })?;
            self.store.save(collection);
            (tx, removed, identity)
        };

        let target = identity.user().cloned().zip(removed.remote_id.clone());
        let Some((user, remote_id)) = target else {
            if identity.is_authenticated() {
                debug!(product_id = %removed.product_id, "item never reached server; removed locally");
            }
            tx.commit();
            self.lock().settle(None);
            return Ok(removed);
        };

        match self.remote.remove_item(&user, &remote_id).await {
            Ok(()) => {
                tx.commit();
                self.lock().settle(None);
                Ok(removed)
            }
            Err(err) => {
                warn!(product_id = %removed.product_id, error = %err, "remote remove failed; rolling back");
                {
                    let mut inner = self.lock();
                    let restored = tx.revert();
                    self.store.save(&restored);
                    if let Ok(collection) = inner.collection_mut() {
                        *collection = restored;
                    }
                    inner.settle(Some(format!("remove failed: {err}")));
                }
                if let RemoteError::Auth(reason) = &err {
                    self.report_auth(reason);
                }
                Err(err.into())
            }
        }
    }

    /// Remove every item. All-or-nothing: if any server removal fails the
    /// whole collection is restored and [`Error::ClearFailed`] is returned.
    ///
    /// Returns the number of items removed.
    pub async fn clear(&self) -> Result<usize> {
        let _guard = self.mutation_guard.try_lock().map_err(|_| Error::Busy)?;

        let (tx, removed, identity) = {
            let mut inner = self.lock();
            let identity = inner.identity.clone();
            let collection = inner.collection_mut()?;
            let tx = Transaction::begin("clear", collection);
            let removed = tx.apply(collection, |c| Ok(c.drain()))?;
            self.store.save(collection);
            if identity.is_authenticated() {
                inner.begin_sync();
            }
            (tx, removed, identity)
        };

        let mut failures = Vec::new();
        let mut auth_failure = None;
        if let Some(user) = identity.user() {
            for item in &removed {
                let Some(remote_id) = &item.remote_id else {
                    continue;
                };
                if let Err(err) = self.remote.remove_item(user, remote_id).await {
                    failures.push(ItemFailure {
                        item_id: item.id.clone(),
                        product_id: item.product_id.clone(),
                        reason: err.to_string(),
                    });
                    if let RemoteError::Auth(reason) = err {
                        auth_failure = Some(reason);
                        break;
                    }
                }
            }
        }

        if failures.is_empty() {
            tx.commit();
            self.lock().settle(None);
            info!(items = removed.len(), "collection cleared");
            return Ok(removed.len());
        }

        warn!(
            failed = failures.len(),
            "clear failed remotely; restoring collection"
        );
        {
            let mut inner = self.lock();
            let restored = tx.revert();
            self.store.save(&restored);
            if let Ok(collection) = inner.collection_mut() {
                *collection = restored;
            }
            inner.settle(Some(format!(
                "clear failed for {} item(s)",
                failures.len()
            )));
        }
        if let Some(reason) = auth_failure {
            self.report_auth(&reason);
        }
        Err(Error::ClearFailed { failures })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryRemote, StaticCatalog};
    use crate::{MemorySnapshotStore, ProductSnapshot};

    fn engine(identity: Identity) -> (SyncEngine, Arc<MemoryRemote>, Arc<MemorySnapshotStore>) {
        let store = Arc::new(MemorySnapshotStore::new());
        let remote = Arc::new(MemoryRemote::new());
        let catalog = Arc::new(
            StaticCatalog::new()
                .with_product("1", ProductSnapshot::titled("One"))
                .with_product("2", ProductSnapshot::titled("Two")),
        );
        let engine = SyncEngine::new(identity, store.clone(), remote.clone(), catalog);
        (engine, remote, store)
    }

    #[tokio::test]
    async fn operations_require_bootstrap() {
        let (engine, _, _) = engine(Identity::Anonymous);

        assert_eq!(engine.status(), EngineStatus::Uninitialized);
        assert_eq!(engine.add_item("1").await, Err(Error::NotInitialized));
        assert_eq!(engine.clear().await, Err(Error::NotInitialized));
        assert!(!engine.is_in_collection("1"));
        assert_eq!(engine.count(), 0);
    }

    #[tokio::test]
    async fn bootstrap_twice_is_noop() {
        let (engine, _, store) = engine(Identity::Anonymous);

        assert_eq!(engine.bootstrap().await, Ok(MergeOutcome::Skipped));
        engine.add_item("1").await.unwrap();
        assert_eq!(engine.bootstrap().await, Ok(MergeOutcome::Skipped));

        assert_eq!(engine.count(), 1);
        assert_eq!(store.save_count(), 1);
    }

    #[tokio::test]
    async fn anonymous_add_never_calls_remote() {
        let (engine, remote, _) = engine(Identity::Anonymous);
        engine.bootstrap().await.unwrap();

        let outcome = engine.add_item("1").await.unwrap();

        assert_eq!(outcome.warning, None);
        assert_eq!(outcome.item.owner_hint, None);
        assert!(remote.calls().is_empty());
        assert_eq!(engine.status(), EngineStatus::Ready);
    }

    #[tokio::test]
    async fn unknown_product_is_not_inserted() {
        let (engine, _, store) = engine(Identity::Anonymous);
        engine.bootstrap().await.unwrap();

        assert_eq!(
            engine.add_item("404").await,
            Err(Error::ProductNotFound("404".into()))
        );
        assert_eq!(engine.count(), 0);
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn remove_unknown_handle() {
        let (engine, _, _) = engine(Identity::Anonymous);
        engine.bootstrap().await.unwrap();

        assert_eq!(
            engine.remove_item("nope").await,
            Err(Error::NotFound("nope".into()))
        );
        assert_eq!(engine.status(), EngineStatus::Ready);
    }

    #[tokio::test]
    async fn error_state_recovers_on_success() {
        let (engine, remote, _) = engine(Identity::authenticated("alice"));
        engine.bootstrap().await.unwrap();

        remote.fail_adds(true);
        let outcome = engine.add_item("1").await.unwrap();
        assert!(outcome.warning.is_some());
        assert!(engine.last_error().is_some());

        remote.fail_adds(false);
        engine.add_item("2").await.unwrap();
        assert_eq!(
            engine.last_error().as_deref(),
            Some("partially synced: 1 item(s) pending")
        );

        engine.refresh().await.unwrap();
        assert_eq!(engine.last_error(), None);
        assert_eq!(engine.status(), EngineStatus::Ready);
    }

    #[test]
    fn status_serialization_format() {
        let json = serde_json::to_string(&EngineStatus::Error("offline".into())).unwrap();
        assert_eq!(json, r#"{"status":"error","message":"offline"}"#);
    }
}
