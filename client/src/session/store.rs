//! Single authority for "who is logged in".
//!
//! The session store owns the identity and credential pair, performs the
//! login / register / logout operations against the remote authority, and is
//! the only writer of durable client-local session state. Observers are
//! notified of every identity transition inline, so by the time a login or
//! logout call resolves every subscriber has fully processed it.

use crate::api::RemoteApi;
use crate::errors::{ServiceError, ServiceResult};
use crate::session::models::{ActiveSession, CredentialPair, Identity, LoginRequest};
use crate::storage::SessionStorage;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};
use validator::Validate;

/// Observer of session transitions.
///
/// `session_changed` is awaited inside the triggering operation; an
/// anonymous-to-authenticated transition therefore completes its downstream
/// effects (notably the notification store's initial fetch) before the
/// caller sees the operation resolve.
#[async_trait]
pub trait SessionObserver: Send + Sync {
    async fn session_changed(&self, session: Option<ActiveSession>);
}

/// Session store with two states, Anonymous and Authenticated.
///
/// The only path from one authenticated identity to another goes through a
/// logout; there is no account switch without an intervening anonymous
/// state.
pub struct SessionStore {
    api: Arc<dyn RemoteApi>,
    storage: SessionStorage,
    current: RwLock<Option<ActiveSession>>,
    observers: RwLock<Vec<Arc<dyn SessionObserver>>>,
}

impl SessionStore {
    /// Creates a new SessionStore instance.
    pub fn new(api: Arc<dyn RemoteApi>, storage: SessionStorage) -> Self {
        Self {
            api,
            storage,
            current: RwLock::new(None),
            observers: RwLock::new(Vec::new()),
        }
    }

    /// Registers an observer for session transitions.
    pub async fn subscribe(&self, observer: Arc<dyn SessionObserver>) {
        self.observers.write().await.push(observer);
    }

    /// Current identity, if authenticated.
    pub async fn identity(&self) -> Option<Identity> {
        self.current
            .read()
            .await
            .as_ref()
            .map(|s| s.identity.clone())
    }

    /// Current session including credentials, if authenticated.
    pub async fn session(&self) -> Option<ActiveSession> {
        self.current.read().await.clone()
    }

    async fn publish(&self, session: Option<ActiveSession>) {
        *self.current.write().await = session.clone();
        for observer in self.observers.read().await.iter() {
            observer.session_changed(session.clone()).await;
        }
    }

    /// Authenticates against the remote authority.
    ///
    /// Only valid from the anonymous state: a login while a session is
    /// already active is rejected without touching local state, so the only
    /// path to a different identity goes through a logout. On success the
    /// identity and credential pair are persisted as a group and published
    /// to observers before this call returns. On failure no state is
    /// mutated and the remote error payload is carried on the returned
    /// error.
    pub async fn login(&self, username: &str, password: &str) -> ServiceResult<Identity> {
        if let Some(active) = self.current.read().await.as_ref() {
            return Err(ServiceError::invalid_operation(format!(
                "already logged in as {}; log out first",
                active.identity.username
            )));
        }

        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };

        // Validate input
        if let Err(validation_errors) = request.validate() {
            let error_messages: Vec<String> = validation_errors
                .field_errors()
                .into_iter()
                .flat_map(|(field, errors)| {
                    errors.iter().map(move |error| {
                        format!(
                            "{}: {}",
                            field,
                            error.message.as_ref().unwrap_or(&"Invalid value".into())
                        )
                    })
                })
                .collect();
            return Err(ServiceError::validation(error_messages.join(", ")));
        }

        let response = self.api.login(&request).await?;

        let session = ActiveSession {
            identity: response.user,
            credentials: CredentialPair {
                access_token: response.access_token,
                refresh_token: response.refresh_token,
            },
        };

        self.storage.save(&session)?;
        self.publish(Some(session.clone())).await;

        info!(
            "Logged in as {} (role {:?})",
            session.identity.username, session.identity.role
        );
        Ok(session.identity)
    }

    /// Forwards a registration payload to the remote authority.
    ///
    /// Registration never mutates session state: accounts go through an
    /// approval workflow and require a manual login afterwards.
    pub async fn register(&self, payload: &Value) -> ServiceResult<Value> {
        self.api.register(payload).await
    }

    /// Clears all durable client-local state, drops the in-memory session
    /// and publishes the transition to observers. Unconditional and
    /// irreversible; the consumer surface is expected to fall back to its
    /// unauthenticated entry point on the `None` transition.
    pub async fn logout(&self) -> ServiceResult<()> {
        self.storage.clear_all()?;
        self.publish(None).await;
        info!("Logged out; client-local state cleared");
        Ok(())
    }

    /// Restores a persisted session at process start.
    ///
    /// Meant to run once at boot, before any login: like
    /// [`login`](Self::login) it is rejected while a session is already
    /// active.
    /// Trusts local storage: no network round-trip is made here. Returns the
    /// restored identity, or `None` when nothing usable is persisted.
    pub async fn restore_session(&self) -> ServiceResult<Option<Identity>> {
        if let Some(active) = self.current.read().await.as_ref() {
            return Err(ServiceError::invalid_operation(format!(
                "session already active for {}",
                active.identity.username
            )));
        }

        match self.storage.load()? {
            Some(session) => {
                let identity = session.identity.clone();
                self.publish(Some(session)).await;
                info!("Restored persisted session for {}", identity.username);
                Ok(Some(identity))
            }
            None => Ok(None),
        }
    }

    /// Optional follow-up to [`restore_session`](Self::restore_session):
    /// asks the remote authority whether the restored credential is still
    /// accepted. On rejection the session is torn down exactly like a logout
    /// and `SessionStale` is returned. A no-op when anonymous.
    pub async fn validate_restored_session(&self) -> ServiceResult<()> {
        let Some(session) = self.session().await else {
            return Ok(());
        };

        if self
            .api
            .validate_session(&session.credentials.access_token)
            .await?
        {
            return Ok(());
        }

        warn!("Persisted credential rejected by the remote authority; clearing session");
        self.logout().await?;
        Err(ServiceError::session_stale(
            "persisted credential no longer valid",
        ))
    }
}
