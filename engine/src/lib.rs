//! # Tote Engine
//!
//! A local/remote sync engine for saved-item collections (wishlists, carts).
//!
//! The engine keeps one collection of saved products on the device,
//! persists it across restarts, and keeps it in step with the user's server
//! collection once they sign in. Anonymous users work fully offline.
//!
//! ## Design Principles
//!
//! - **Local first**: every change lands locally (and on disk) before any
//!   network call
//! - **One writer**: [`SyncEngine`] is the only thing that touches the
//!   collection or the snapshot store
//! - **Remote wins**: when both sides hold a product, the server's copy is
//!   kept
//! - **No duplicates**: a collection never holds two items for one product
//!
//! ## Core Concepts
//!
//! ### Items
//!
//! A [`CollectionItem`] is one saved product: a local handle, the product
//! id, display fields captured by a [`ProductResolver`], and sync metadata
//! (`owner_hint`, `remote_id`, `pending_push`).
//!
//! ### Transactions
//!
//! Mutations are optimistic. A [`Transaction`] snapshots the collection,
//! the change is applied and persisted, and the snapshot is restored if the
//! server refuses.
//!
//! ### Merge
//!
//! On sign-in the local collection is merged with the server's via
//! [`merge::merge`]. Local-only items are pushed; remote-only items are
//! pulled; conflicts go to the server.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tote_engine::{
//!     EngineConfig, HttpProductResolver, HttpRemoteClient, Identity, SyncEngine,
//! };
//!
//! let config = EngineConfig::from_env()?;
//! let client = config.http_client(Default::default())?;
//! let api = config.api_url()?;
//!
//! let engine = SyncEngine::new(
//!     Identity::Anonymous,
//!     Arc::new(config.snapshot_store()),
//!     Arc::new(HttpRemoteClient::new(client.clone(), api.clone())),
//!     Arc::new(HttpProductResolver::new(client, api)),
//! );
//!
//! engine.bootstrap().await?;
//! engine.add_item("sku-123").await?;
//! assert!(engine.is_in_collection("sku-123"));
//!
//! // Signing in merges the anonymous collection into the user's.
//! engine.set_identity(Identity::authenticated("alice")).await?;
//! ```
//!
//! ## Persistence
//!
//! Snapshots are JSON envelopes ([`PersistedSnapshot`]) stored under a fixed
//! key. Unreadable snapshots are discarded and the engine starts empty.

pub mod collection;
pub mod config;
pub mod engine;
pub mod error;
pub mod identity;
pub mod item;
pub mod memory;
pub mod merge;
pub mod remote;
pub mod resolver;
pub mod snapshot;
pub mod transaction;

// Re-export main types at crate root
pub use collection::Collection;
pub use config::{ConfigError, EngineConfig};
pub use engine::{AddOutcome, EngineState, EngineStatus, MergeOutcome, SyncEngine};
pub use error::{Error, ItemFailure};
pub use identity::{AuthObserver, Identity, IdentityTransition, SessionIdentity};
pub use item::{CollectionItem, Price, ProductSnapshot, RemoteItem};
pub use memory::{MemoryRemote, RemoteCall, StaticCatalog};
pub use merge::{MergePlan, MergeReport, PushTarget};
pub use remote::{HttpRemoteClient, RemoteCollectionClient, RemoteError};
pub use resolver::{HttpProductResolver, ProductResolver, ResolveError};
pub use snapshot::{
    FileSnapshotStore, MemorySnapshotStore, PersistedSnapshot, SnapshotStore, StorageCorruption,
    DEFAULT_STORAGE_KEY, SNAPSHOT_FORMAT_VERSION,
};
pub use transaction::Transaction;

/// Type aliases for clarity
pub type ItemId = String;
pub type ProductId = String;
pub type UserId = String;
pub type RemoteItemId = String;
