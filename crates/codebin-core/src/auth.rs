//! Caller identity and auth-state watching.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// An authenticated caller: the email the backend keys access on, plus
/// the bearer token it expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub email: String,
    pub token: String,
}

impl Identity {
    pub fn new(email: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            token: token.into(),
        }
    }
}

/// A change in authentication state, as seen by a subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn(Identity),
    SignedOut,
}

/// Holds the current identity and broadcasts changes.
///
/// Replaces ambient auth listeners with explicit subscriptions:
/// [`AuthWatcher::subscribe`] hands out an [`AuthSubscription`], and
/// dropping the subscription is the teardown. Constructed once at
/// startup and shared by the parts that need the caller identity.
#[derive(Debug)]
pub struct AuthWatcher {
    tx: watch::Sender<Option<Identity>>,
}

impl AuthWatcher {
    pub fn new(initial: Option<Identity>) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// The identity as of this call, if anyone is signed in.
    pub fn current(&self) -> Option<Identity> {
        self.tx.borrow().clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.tx.borrow().is_some()
    }

    pub fn sign_in(&self, identity: Identity) {
        self.tx.send_replace(Some(identity));
    }

    pub fn sign_out(&self) {
        self.tx.send_replace(None);
    }

    /// Registers a new subscription. The subscription observes every
    /// state change from this point on; dropping it unsubscribes.
    pub fn subscribe(&self) -> AuthSubscription {
        AuthSubscription {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for AuthWatcher {
    fn default() -> Self {
        Self::new(None)
    }
}

/// A live subscription to auth-state changes.
///
/// Scoped acquisition/release: the subscription stops receiving the
/// moment it is dropped, nothing else to unregister.
#[derive(Debug)]
pub struct AuthSubscription {
    rx: watch::Receiver<Option<Identity>>,
}

impl AuthSubscription {
    /// The identity as this subscription last observed it.
    pub fn current(&self) -> Option<Identity> {
        self.rx.borrow().clone()
    }

    /// Waits for the next auth-state change.
    ///
    /// Returns `None` once the watcher itself has been dropped, which
    /// ends the subscription's stream of events.
    pub async fn next_event(&mut self) -> Option<AuthEvent> {
        self.rx.changed().await.ok()?;
        let event = match self.rx.borrow_and_update().clone() {
            Some(identity) => AuthEvent::SignedIn(identity),
            None => AuthEvent::SignedOut,
        };
        Some(event)
    }
}
