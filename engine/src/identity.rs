//! Session identity and its transitions.
//!
//! The engine never reads identity from ambient state. It is given an
//! [`Identity`] at construction and told about changes explicitly; the
//! [`SessionIdentity`] handle is a convenience for wiring an auth
//! collaborator's events into the engine.

use crate::UserId;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{info, warn};

/// Who the current session belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "userId", rename_all = "camelCase")]
pub enum Identity {
    #[default]
    Anonymous,
    Authenticated(UserId),
}

impl Identity {
    pub fn authenticated(user: impl Into<UserId>) -> Self {
        Identity::Authenticated(user.into())
    }

    pub fn user(&self) -> Option<&UserId> {
        match self {
            Identity::Anonymous => None,
            Identity::Authenticated(user) => Some(user),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user().is_some()
    }
}

/// The effect of moving from one identity to another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityTransition {
    Unchanged,
    SignedIn(UserId),
    SignedOut(UserId),
    Switched { from: UserId, to: UserId },
}

impl IdentityTransition {
    pub fn between(previous: &Identity, next: &Identity) -> Self {
        match (previous, next) {
            (Identity::Anonymous, Identity::Anonymous) => IdentityTransition::Unchanged,
            (Identity::Anonymous, Identity::Authenticated(to)) => {
                IdentityTransition::SignedIn(to.clone())
            }
            (Identity::Authenticated(from), Identity::Anonymous) => {
                IdentityTransition::SignedOut(from.clone())
            }
            (Identity::Authenticated(from), Identity::Authenticated(to)) if from == to => {
                IdentityTransition::Unchanged
            }
            (Identity::Authenticated(from), Identity::Authenticated(to)) => {
                IdentityTransition::Switched {
                    from: from.clone(),
                    to: to.clone(),
                }
            }
        }
    }

    /// The user whose server-owned items leave the local view.
    pub fn departing(&self) -> Option<&UserId> {
        match self {
            IdentityTransition::SignedOut(from) | IdentityTransition::Switched { from, .. } => {
                Some(from)
            }
            _ => None,
        }
    }

    /// Whether this transition starts the merge protocol.
    pub fn triggers_merge(&self) -> bool {
        matches!(
            self,
            IdentityTransition::SignedIn(_) | IdentityTransition::Switched { .. }
        )
    }
}

/// Receives authentication failures the engine hits while talking to the
/// server. The engine reports them and does nothing else about them.
pub trait AuthObserver: Send + Sync {
    fn on_auth_rejected(&self, reason: &str);
}

/// Observable session identity backed by a `watch` channel.
#[derive(Debug)]
pub struct SessionIdentity {
    tx: watch::Sender<Identity>,
}

impl SessionIdentity {
    pub fn new(initial: Identity) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    pub fn current(&self) -> Identity {
        self.tx.borrow().clone()
    }

    /// Subscribe to identity changes.
    pub fn subscribe(&self) -> watch::Receiver<Identity> {
        self.tx.subscribe()
    }

    pub fn sign_in(&self, user: impl Into<UserId>) {
        self.set(Identity::Authenticated(user.into()));
    }

    pub fn sign_out(&self) {
        self.set(Identity::Anonymous);
    }

    fn set(&self, identity: Identity) {
        self.tx.send_if_modified(|current| {
            if *current == identity {
                return false;
            }
            *current = identity;
            true
        });
    }
}

impl AuthObserver for SessionIdentity {
    fn on_auth_rejected(&self, reason: &str) {
        if self.current().is_authenticated() {
            warn!(reason, "server rejected session credentials; signing out");
            self.sign_out();
        } else {
            info!(reason, "auth rejection for an already anonymous session");
        }
    }
}
