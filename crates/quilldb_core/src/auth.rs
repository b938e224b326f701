//! Auth facade: session lifecycle and state-change notification.
//!
//! Two states, Anonymous and Authenticated. `sign_in`/`sign_up` move to
//! Authenticated (or fail without touching state), `sign_out` moves back.
//! The initial state is whatever session marker the store already holds,
//! so returning users stay signed in across restarts.
//!
//! # Notification
//!
//! Listeners subscribe with [`AuthService::subscribe`] and receive
//! [`AuthEvent`]s over a channel:
//!
//! - Sign-in/sign-out events are enqueued synchronously in registration
//!   order.
//! - The current session state is enqueued once at subscription time, so a
//!   fresh subscriber learns the state without polling - but it observes
//!   the event on a later receive, never synchronously inside `subscribe`.

use crate::error::{CoreError, CoreResult};
use crate::record::{RecordId, SessionUser, LOCAL_USER_ID};
use crate::store::EntityStore;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Message shown to the user when sign-in credentials don't match.
const INVALID_CREDENTIALS: &str = "invalid username or password";

/// An auth state change.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthEvent {
    /// A session was established; carries the session user.
    SignedIn(SessionUser),
    /// The session was cleared.
    SignedOut,
}

/// A registered auth listener.
///
/// Holds the receiving end of the listener's channel plus the registry id
/// used by [`AuthService::unsubscribe`]. Dropping the subscription without
/// unsubscribing is also fine; the registry prunes dead senders on the
/// next emit.
pub struct AuthSubscription {
    id: u64,
    receiver: Receiver<AuthEvent>,
}

impl AuthSubscription {
    /// Returns the registry id of this subscription.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Returns the next pending event without blocking, if any.
    #[must_use]
    pub fn try_next(&self) -> Option<AuthEvent> {
        self.receiver.try_recv().ok()
    }

    /// Waits up to `timeout` for the next event.
    pub fn next_timeout(&self, timeout: Duration) -> Result<AuthEvent, RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}

/// Session establishment and change notification over an entity store.
pub struct AuthService {
    store: Arc<EntityStore>,
    listeners: RwLock<Vec<(u64, Sender<AuthEvent>)>>,
    next_subscription: AtomicU64,
}

impl AuthService {
    /// Creates an auth facade over the given store.
    #[must_use]
    pub fn new(store: Arc<EntityStore>) -> Self {
        Self {
            store,
            listeners: RwLock::new(Vec::new()),
            next_subscription: AtomicU64::new(1),
        }
    }

    /// Signs in with a username or email identifier.
    ///
    /// On success the session user is persisted and every listener is
    /// notified, in registration order, before this returns.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] on credential mismatch; no state
    /// is changed in that case.
    pub fn sign_in(&self, identifier: &str, password: &str) -> CoreResult<SessionUser> {
        let identity = self.store.credentials()?;

        let matches = self.store.validate_credentials(identifier, password)?
            || match &identity {
                Some(identity) if identity.email == identifier => self
                    .store
                    .validate_credentials(&identity.username, password)?,
                _ => false,
            };

        if !matches {
            debug!(identifier, "sign-in rejected");
            return Err(CoreError::validation(INVALID_CREDENTIALS));
        }

        // Credentials matched, so the identity record exists.
        let identity = identity.ok_or_else(|| CoreError::validation(INVALID_CREDENTIALS))?;
        let user = SessionUser {
            id: LOCAL_USER_ID.to_string(),
            email: identity.email,
            display_name: identity.username,
        };

        self.store.set_current_user(Some(&user))?;
        self.emit(&AuthEvent::SignedIn(user.clone()));

        info!(user = %user.display_name, "signed in");
        Ok(user)
    }

    /// Registers an account and signs it in.
    ///
    /// Registration-as-replacement: the single credentials record is
    /// unconditionally overwritten, so only one account exists at a time.
    /// The username is the email's local part (the full identifier when it
    /// contains no `@`).
    pub fn sign_up(&self, email: &str, password: &str) -> CoreResult<SessionUser> {
        let username = match email.split_once('@') {
            Some((local, _)) => local,
            None => email,
        };
        self.store.update_credentials(username, password, email)?;

        let user = SessionUser {
            id: RecordId::generate().to_string(),
            email: email.to_string(),
            display_name: username.to_string(),
        };

        self.store.set_current_user(Some(&user))?;
        self.emit(&AuthEvent::SignedIn(user.clone()));

        info!(user = %user.display_name, "signed up");
        Ok(user)
    }

    /// Clears the session and notifies listeners.
    pub fn sign_out(&self) -> CoreResult<()> {
        self.store.set_current_user(None)?;
        self.emit(&AuthEvent::SignedOut);

        info!("signed out");
        Ok(())
    }

    /// Returns the current session user, or `None` when anonymous.
    pub fn current_user(&self) -> CoreResult<Option<SessionUser>> {
        self.store.current_user()
    }

    /// Registers a listener for auth state changes.
    ///
    /// The current session state is enqueued into the new subscription
    /// immediately - and only into it - so the subscriber observes it
    /// exactly once, on its next receive.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted session marker cannot be read.
    pub fn subscribe(&self) -> CoreResult<AuthSubscription> {
        let (tx, rx) = mpsc::channel();
        let id = self.next_subscription.fetch_add(1, Ordering::Relaxed);

        let initial = match self.store.current_user()? {
            Some(user) => AuthEvent::SignedIn(user),
            None => AuthEvent::SignedOut,
        };
        // The send cannot fail: we still hold the receiver.
        let _ = tx.send(initial);

        self.listeners.write().push((id, tx));
        Ok(AuthSubscription { id, receiver: rx })
    }

    /// Removes a listener from the registry.
    pub fn unsubscribe(&self, subscription: &AuthSubscription) {
        self.listeners
            .write()
            .retain(|(id, _)| *id != subscription.id);
    }

    /// Returns the number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }

    fn emit(&self, event: &AuthEvent) {
        let mut listeners = self.listeners.write();
        listeners.retain(|(_, tx)| tx.send(event.clone()).is_ok());
    }
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("listener_count", &self.listener_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AuthService {
        AuthService::new(Arc::new(EntityStore::open_in_memory().unwrap()))
    }

    #[test]
    fn sign_in_with_default_username() {
        let auth = service();
        let user = auth.sign_in("admin", "admin").unwrap();

        assert_eq!(user.display_name, "admin");
        assert_eq!(user.id, LOCAL_USER_ID);
        assert_eq!(auth.current_user().unwrap(), Some(user));
    }

    #[test]
    fn sign_in_with_email_identifier() {
        let auth = service();
        let user = auth.sign_in("admin@example.com", "admin").unwrap();
        assert_eq!(user.display_name, "admin");
    }

    #[test]
    fn wrong_password_is_rejected_without_state_change() {
        let auth = service();
        let result = auth.sign_in("admin", "wrong");

        assert!(matches!(result, Err(CoreError::Validation { .. })));
        assert!(auth.current_user().unwrap().is_none());
    }

    #[test]
    fn sign_up_replaces_the_account() {
        let auth = service();
        let user = auth.sign_up("writer@example.com", "s3cret").unwrap();

        assert_eq!(user.display_name, "writer");
        assert_eq!(user.email, "writer@example.com");
        assert_ne!(user.id, LOCAL_USER_ID);

        // The old account is gone; the new one signs in.
        assert!(auth.sign_in("admin", "admin").is_err());
        assert!(auth.sign_in("writer", "s3cret").is_ok());
    }

    #[test]
    fn sign_up_without_at_uses_full_identifier() {
        let auth = service();
        let user = auth.sign_up("writer", "s3cret").unwrap();
        assert_eq!(user.display_name, "writer");
    }

    #[test]
    fn sign_out_clears_session() {
        let auth = service();
        auth.sign_in("admin", "admin").unwrap();
        auth.sign_out().unwrap();
        assert!(auth.current_user().unwrap().is_none());
    }

    #[test]
    fn subscriber_gets_initial_state_exactly_once() {
        let auth = service();
        let sub = auth.subscribe().unwrap();

        assert_eq!(sub.try_next(), Some(AuthEvent::SignedOut));
        assert_eq!(sub.try_next(), None);
    }

    #[test]
    fn subscriber_after_sign_in_sees_signed_in_initial_state() {
        let auth = service();
        auth.sign_in("admin", "admin").unwrap();

        let sub = auth.subscribe().unwrap();
        assert!(matches!(sub.try_next(), Some(AuthEvent::SignedIn(_))));
    }

    #[test]
    fn listeners_receive_events_in_registration_order() {
        let auth = service();
        let first = auth.subscribe().unwrap();
        let second = auth.subscribe().unwrap();

        // Drain the initial states.
        first.try_next();
        second.try_next();

        auth.sign_in("admin", "admin").unwrap();
        assert!(matches!(first.try_next(), Some(AuthEvent::SignedIn(_))));
        assert!(matches!(second.try_next(), Some(AuthEvent::SignedIn(_))));

        auth.sign_out().unwrap();
        assert_eq!(first.try_next(), Some(AuthEvent::SignedOut));
        assert_eq!(second.try_next(), Some(AuthEvent::SignedOut));
    }

    #[test]
    fn unsubscribed_listener_receives_nothing_more() {
        let auth = service();
        let sub = auth.subscribe().unwrap();
        sub.try_next();

        auth.unsubscribe(&sub);
        assert_eq!(auth.listener_count(), 0);

        auth.sign_in("admin", "admin").unwrap();
        assert_eq!(sub.try_next(), None);
    }

    #[test]
    fn dropped_subscription_is_pruned_on_emit() {
        let auth = service();
        let sub = auth.subscribe().unwrap();
        assert_eq!(auth.listener_count(), 1);

        drop(sub);
        auth.sign_in("admin", "admin").unwrap();
        assert_eq!(auth.listener_count(), 0);
    }

    #[test]
    fn failed_sign_in_emits_no_event() {
        let auth = service();
        let sub = auth.subscribe().unwrap();
        sub.try_next();

        let _ = auth.sign_in("admin", "wrong");
        assert_eq!(sub.try_next(), None);
    }
}
