//! Locally cached view of the notification feed and its polling lifecycle.
//!
//! The store mirrors the server's feed and unread count wholesale on every
//! refresh; there is no optimistic local mutation, so the cache is always a
//! self-consistent snapshot of the remote authority's state. Polling is
//! armed when a session appears, disarmed when it goes away, and a failed
//! cycle never kills the loop.

use crate::api::RemoteApi;
use crate::errors::{ServiceError, ServiceResult};
use crate::notifications::models::Notification;
use crate::session::models::ActiveSession;
use crate::session::store::SessionObserver;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Cached feed state, replaced as a unit by every successful refresh.
#[derive(Debug, Default)]
struct FeedCache {
    items: Vec<Notification>,
    unread: u64,
}

/// State shared with the polling task.
struct Inner {
    api: Arc<dyn RemoteApi>,
    session: Mutex<Option<ActiveSession>>,
    cache: Mutex<FeedCache>,
}

impl Inner {
    /// Re-reads the feed and the unread count and replaces both cache halves
    /// wholesale. A no-op when no session is active: the caller sees `Ok`
    /// and the cache stays empty.
    async fn refresh(&self) -> ServiceResult<()> {
        let Some(session) = self.session.lock().await.clone() else {
            debug!("Notification refresh skipped: no active session");
            return Ok(());
        };
        let token = session.credentials.access_token;

        let items = self.api.list_notifications(&token).await?;
        let unread = self.api.unread_count(&token).await?;

        let mut cache = self.cache.lock().await;
        cache.items = items;
        cache.unread = unread;
        Ok(())
    }
}

/// Notification store.
///
/// Activation is derived strictly from session transitions delivered through
/// [`SessionObserver`]; at most one poll timer is armed at any time.
pub struct NotificationStore {
    inner: Arc<Inner>,
    poll_interval: Duration,
    poller: Mutex<Option<JoinHandle<()>>>,
}

impl NotificationStore {
    /// Creates a new NotificationStore instance.
    pub fn new(api: Arc<dyn RemoteApi>, poll_interval: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                session: Mutex::new(None),
                cache: Mutex::new(FeedCache::default()),
            }),
            poll_interval,
            poller: Mutex::new(None),
        }
    }

    /// Cached feed in server order.
    pub async fn notifications(&self) -> Vec<Notification> {
        self.inner.cache.lock().await.items.clone()
    }

    /// Server-computed unread count as of the last refresh.
    pub async fn unread_count(&self) -> u64 {
        self.inner.cache.lock().await.unread
    }

    /// Explicit refresh. A silent no-op when anonymous; failures propagate
    /// to the caller as `FeedSync`.
    pub async fn refresh(&self) -> ServiceResult<()> {
        self.inner.refresh().await
    }

    /// Marks one notification read on the server, then refreshes to
    /// reconcile. The cache is never mutated locally; a failed reconcile is
    /// logged and left for the next poll cycle to converge.
    pub async fn mark_read(&self, notification_id: &str) -> ServiceResult<()> {
        let Some(session) = self.inner.session.lock().await.clone() else {
            return Err(ServiceError::feed_sync("no active session"));
        };

        self.inner
            .api
            .mark_read(&session.credentials.access_token, notification_id)
            .await?;

        if let Err(e) = self.inner.refresh().await {
            warn!("Reconcile after mark-read failed: {}", e);
        }
        Ok(())
    }

    /// Marks the entire feed read on the server, then refreshes to
    /// reconcile.
    pub async fn mark_all_read(&self) -> ServiceResult<()> {
        let Some(session) = self.inner.session.lock().await.clone() else {
            return Err(ServiceError::feed_sync("no active session"));
        };

        self.inner
            .api
            .mark_all_read(&session.credentials.access_token)
            .await?;

        if let Err(e) = self.inner.refresh().await {
            warn!("Reconcile after mark-all-read failed: {}", e);
        }
        Ok(())
    }

    /// Arms the recurring poll timer, aborting any previously armed one
    /// first so that arming is idempotent.
    async fn arm_poller(&self) {
        let inner = Arc::clone(&self.inner);
        let interval = self.poll_interval;

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The immediate first tick is consumed here; the activation path
            // has already performed the initial refresh.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if let Err(e) = inner.refresh().await {
                    warn!("Background notification refresh failed: {}", e);
                }
            }
        });

        if let Some(previous) = self.poller.lock().await.replace(handle) {
            previous.abort();
        }
    }

    async fn disarm_poller(&self) {
        if let Some(handle) = self.poller.lock().await.take() {
            handle.abort();
        }
    }
}

#[async_trait]
impl SessionObserver for NotificationStore {
    async fn session_changed(&self, session: Option<ActiveSession>) {
        match session {
            Some(session) => {
                *self.inner.session.lock().await = Some(session);
                // Initial fetch happens before the triggering login/restore
                // resolves; a failure here must not fail the login.
                if let Err(e) = self.inner.refresh().await {
                    warn!("Initial notification refresh failed: {}", e);
                }
                self.arm_poller().await;
                info!("Notification polling armed");
            }
            None => {
                self.disarm_poller().await;
                *self.inner.session.lock().await = None;
                *self.inner.cache.lock().await = FeedCache::default();
                info!("Notification polling disarmed; cache cleared");
            }
        }
    }
}
