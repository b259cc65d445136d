//! Edge case tests for tote-engine
//!
//! These tests cover unusual stored data and arbitrary operation sequences.

use proptest::prelude::*;
use std::sync::Arc;
use tote_engine::{
    Collection, CollectionItem, EngineStatus, FileSnapshotStore, Identity, MemoryRemote,
    MemorySnapshotStore, PersistedSnapshot, ProductSnapshot, SnapshotStore, StaticCatalog,
    SyncEngine,
};

fn catalog() -> StaticCatalog {
    let mut catalog = StaticCatalog::new();
    for id in 0..6 {
        catalog = catalog.with_product(id.to_string(), ProductSnapshot::titled(format!("#{id}")));
    }
    catalog
}

fn engine_over(store: Arc<dyn SnapshotStore>) -> SyncEngine {
    SyncEngine::new(
        Identity::Anonymous,
        store,
        Arc::new(MemoryRemote::new()),
        Arc::new(catalog()),
    )
}

fn item(product_id: &str) -> CollectionItem {
    CollectionItem::new(product_id, ProductSnapshot::titled(product_id), None)
}

fn assert_unique(items: &[CollectionItem]) {
    let mut seen = std::collections::HashSet::new();
    for item in items {
        assert!(
            seen.insert(item.product_id.as_str()),
            "duplicate product {}",
            item.product_id
        );
    }
}

// ============================================================================
// Stored Snapshot Edge Cases
// ============================================================================

#[tokio::test]
async fn malformed_snapshot_starts_empty() {
    let store = Arc::new(MemorySnapshotStore::with_raw("{\"formatVersion\": 1, \"items\": ["));
    let engine = engine_over(store);

    engine.bootstrap().await.unwrap();

    assert_eq!(engine.count(), 0);
    assert_eq!(engine.status(), EngineStatus::Ready);
}

#[tokio::test]
async fn legacy_array_snapshot_is_migrated() {
    let legacy = serde_json::to_string(&vec![item("1"), item("2")]).unwrap();
    let store = Arc::new(MemorySnapshotStore::with_raw(legacy));
    let engine = engine_over(store.clone());

    engine.bootstrap().await.unwrap();
    assert_eq!(engine.count(), 2);

    engine.add_item("3").await.unwrap();
    let saved = PersistedSnapshot::decode(&store.raw().unwrap()).unwrap();
    assert_eq!(saved.format_version, 1);
    assert_eq!(saved.items.len(), 3);
}

#[tokio::test]
async fn future_snapshot_version_is_discarded() {
    let raw = serde_json::json!({
        "formatVersion": 99,
        "savedAt": "2030-01-01T00:00:00Z",
        "items": [item("1")],
    })
    .to_string();
    let engine = engine_over(Arc::new(MemorySnapshotStore::with_raw(raw)));

    engine.bootstrap().await.unwrap();

    assert_eq!(engine.count(), 0);
}

#[tokio::test]
async fn duplicate_products_in_snapshot_are_repaired() {
    let mut snapshot = PersistedSnapshot::capture(&Collection::new());
    snapshot.items = vec![item("1"), item("2"), item("1")];
    let store = Arc::new(MemorySnapshotStore::with_raw(snapshot.to_json().unwrap()));
    let engine = engine_over(store.clone());

    engine.bootstrap().await.unwrap();

    let products: Vec<_> = engine.items().into_iter().map(|i| i.product_id).collect();
    assert_eq!(products, vec!["1", "2"]);
    assert_eq!(store.save_count(), 1);
}

#[tokio::test]
async fn file_store_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    let first = engine_over(Arc::new(FileSnapshotStore::new(dir.path(), "tote.cart")));
    first.bootstrap().await.unwrap();
    first.add_item("4").await.unwrap();
    first.add_item("5").await.unwrap();
    let before = first.items();
    drop(first);

    let second = engine_over(Arc::new(FileSnapshotStore::new(dir.path(), "tote.cart")));
    second.bootstrap().await.unwrap();

    assert_eq!(second.items(), before);
}

#[tokio::test]
async fn unicode_and_odd_product_ids() {
    let ids = ["日本語", "sku/with/slashes", "  spaced  ", "🎉"];
    let mut catalog = StaticCatalog::new();
    for id in ids {
        catalog = catalog.with_product(id, ProductSnapshot::titled(id));
    }
    let engine = SyncEngine::new(
        Identity::Anonymous,
        Arc::new(MemorySnapshotStore::new()),
        Arc::new(MemoryRemote::new()),
        Arc::new(catalog),
    );
    engine.bootstrap().await.unwrap();

    for id in ids {
        engine.add_item(id).await.unwrap();
    }

    assert_eq!(engine.count(), ids.len());
    assert!(ids.iter().all(|id| engine.is_in_collection(id)));
    assert!(!engine.is_in_collection("日本"));
}

// ============================================================================
// Arbitrary Operation Sequences
// ============================================================================

#[derive(Debug, Clone)]
enum Step {
    Add(u8),
    Remove(u8),
    Clear,
    SignIn,
    SignOut,
    Refresh,
    Outage(bool),
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        4 => (0u8..6).prop_map(Step::Add),
        2 => (0u8..6).prop_map(Step::Remove),
        1 => Just(Step::Clear),
        1 => Just(Step::SignIn),
        1 => Just(Step::SignOut),
        1 => Just(Step::Refresh),
        1 => any::<bool>().prop_map(Step::Outage),
    ]
}

async fn run_steps(steps: Vec<Step>) -> Vec<Vec<CollectionItem>> {
    let remote = Arc::new(MemoryRemote::new());
    remote.seed("alice", "2", ProductSnapshot::titled("server two"));
    let engine = SyncEngine::new(
        Identity::Anonymous,
        Arc::new(MemorySnapshotStore::new()),
        remote.clone(),
        Arc::new(catalog()),
    );
    engine.bootstrap().await.unwrap();

    let mut observed = Vec::with_capacity(steps.len());
    for step in steps {
        // Results are ignored; only the resulting collection is checked.
        match step {
            Step::Add(p) => {
                let _ = engine.add_item(p.to_string()).await;
            }
            Step::Remove(p) => {
                let handle = engine
                    .items()
                    .into_iter()
                    .find(|i| i.product_id == p.to_string())
                    .map(|i| i.id);
                if let Some(handle) = handle {
                    let _ = engine.remove_item(&handle).await;
                }
            }
            Step::Clear => {
                let _ = engine.clear().await;
            }
            Step::SignIn => {
                let _ = engine.set_identity(Identity::authenticated("alice")).await;
            }
            Step::SignOut => {
                let _ = engine.set_identity(Identity::Anonymous).await;
            }
            Step::Refresh => {
                let _ = engine.refresh().await;
            }
            Step::Outage(down) => {
                remote.fail_adds(down);
                remote.fail_removes(down);
            }
        }
        observed.push(engine.items());
    }
    observed
}

proptest! {
    #[test]
    fn prop_collection_never_duplicates(steps in prop::collection::vec(arb_step(), 1..24)) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        for items in runtime.block_on(run_steps(steps)) {
            assert_unique(&items);
        }
    }

    #[test]
    fn prop_add_then_query(products in prop::collection::vec(0u8..6, 1..12)) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        runtime.block_on(async {
            let engine = engine_over(Arc::new(MemorySnapshotStore::new()));
            engine.bootstrap().await.unwrap();
            for p in &products {
                let _ = engine.add_item(p.to_string()).await;
            }
            let distinct: std::collections::HashSet<_> = products.iter().collect();
            assert_eq!(engine.count(), distinct.len());
            for p in &products {
                assert!(engine.is_in_collection(&p.to_string()));
            }
        });
    }
}
