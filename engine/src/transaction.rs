//! Optimistic mutation with commit-or-revert.
//!
//! Every engine mutation runs in three phases: snapshot the collection,
//! apply the change locally, then either commit once the server agrees or
//! revert to the snapshot.

use crate::{error::Result, Collection};
use tracing::debug;

/// An in-progress optimistic change to a [`Collection`].
#[derive(Debug)]
#[must_use = "a transaction must be committed or reverted"]
pub struct Transaction {
    label: &'static str,
    before: Collection,
}

impl Transaction {
    /// Snapshot `current` before changing it.
    pub fn begin(label: &'static str, current: &Collection) -> Self {
        Self {
            label,
            before: current.clone(),
        }
    }

    /// The collection as it was when the transaction began.
    pub fn before(&self) -> &Collection {
        &self.before
    }

    /// Apply a change. If it fails, `current` is restored before returning.
    pub fn apply<T, F>(&self, current: &mut Collection, change: F) -> Result<T>
    where
        F: FnOnce(&mut Collection) -> Result<T>,
    {
        let result = change(current);
        if result.is_err() {
            *current = self.before.clone();
        }
        result
    }

    /// Keep the applied change.
    pub fn commit(self) {
        debug!(label = self.label, "transaction committed");
    }

    /// Drop the applied change, returning the collection to restore.
    pub fn revert(self) -> Collection {
        debug!(
            label = self.label,
            items = self.before.len(),
            "transaction reverted"
        );
        self.before
    }
}
