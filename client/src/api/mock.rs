//! In-memory double of the remote authority used by store tests.

use crate::api::RemoteApi;
use crate::errors::{ServiceError, ServiceResult};
use crate::notifications::models::Notification;
use crate::session::models::{Identity, LoginRequest, LoginResponse, Role};
use async_trait::async_trait;
use serde_json::{Map, Value, json};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// Counters for remote calls issued during a test.
#[derive(Debug, Default, Clone)]
pub struct CallCounts {
    pub login: usize,
    pub register: usize,
    pub list: usize,
    pub unread: usize,
    pub mark_read: usize,
    pub mark_all_read: usize,
    pub validate: usize,
}

impl CallCounts {
    pub fn total(&self) -> usize {
        self.login
            + self.register
            + self.list
            + self.unread
            + self.mark_read
            + self.mark_all_read
            + self.validate
    }
}

/// Scriptable remote authority: tests set up the server-side feed and the
/// login outcome, then assert on the recorded calls.
pub struct MockApi {
    calls: Mutex<CallCounts>,
    login_response: Mutex<Option<LoginResponse>>,
    feed: Mutex<Vec<Notification>>,
    unread: Mutex<u64>,
    fail_feed: AtomicBool,
    accept_session: AtomicBool,
    reject_register: AtomicBool,
}

impl Default for MockApi {
    fn default() -> Self {
        Self {
            calls: Mutex::new(CallCounts::default()),
            login_response: Mutex::new(None),
            feed: Mutex::new(Vec::new()),
            unread: Mutex::new(0),
            fail_feed: AtomicBool::new(false),
            accept_session: AtomicBool::new(true),
            reject_register: AtomicBool::new(false),
        }
    }
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identity(username: &str, role: Role) -> Identity {
        Identity {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            first_name: username.to_string(),
            last_name: "Test".to_string(),
            role,
            extra: Map::new(),
        }
    }

    pub fn notification(id: &str, title: &str, read: bool) -> Notification {
        Notification {
            id: id.to_string(),
            title: title.to_string(),
            message: format!("{} body", title),
            read,
            link: None,
            created_at: None,
        }
    }

    /// Scripts a successful login for the given identity.
    pub fn accept_login(&self, identity: Identity) {
        *self.login_response.lock().unwrap() = Some(LoginResponse {
            access_token: "at-test".to_string(),
            refresh_token: "rt-test".to_string(),
            user: identity,
        });
    }

    /// Scripts the server-side feed and its authoritative unread count.
    pub fn set_feed(&self, items: Vec<Notification>, unread: u64) {
        *self.feed.lock().unwrap() = items;
        *self.unread.lock().unwrap() = unread;
    }

    pub fn set_feed_failing(&self, failing: bool) {
        self.fail_feed.store(failing, Ordering::SeqCst);
    }

    pub fn set_session_valid(&self, valid: bool) {
        self.accept_session.store(valid, Ordering::SeqCst);
    }

    pub fn reject_registration(&self) {
        self.reject_register.store(true, Ordering::SeqCst);
    }

    pub fn counts(&self) -> CallCounts {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteApi for MockApi {
    async fn login(&self, _request: &LoginRequest) -> ServiceResult<LoginResponse> {
        self.calls.lock().unwrap().login += 1;
        match self.login_response.lock().unwrap().clone() {
            Some(response) => Ok(response),
            None => Err(ServiceError::authentication(
                "invalid credentials",
                Some(json!({"error": "invalid credentials"})),
            )),
        }
    }

    async fn register(&self, _payload: &Value) -> ServiceResult<Value> {
        self.calls.lock().unwrap().register += 1;
        if self.reject_register.load(Ordering::SeqCst) {
            return Err(ServiceError::registration(
                "username taken",
                Some(json!({"error": "username taken"})),
            ));
        }
        Ok(json!({"status": "pending approval"}))
    }

    async fn list_notifications(&self, _access_token: &str) -> ServiceResult<Vec<Notification>> {
        self.calls.lock().unwrap().list += 1;
        if self.fail_feed.load(Ordering::SeqCst) {
            return Err(ServiceError::feed_sync("service unavailable"));
        }
        Ok(self.feed.lock().unwrap().clone())
    }

    async fn unread_count(&self, _access_token: &str) -> ServiceResult<u64> {
        self.calls.lock().unwrap().unread += 1;
        if self.fail_feed.load(Ordering::SeqCst) {
            return Err(ServiceError::feed_sync("service unavailable"));
        }
        Ok(*self.unread.lock().unwrap())
    }

    async fn mark_read(&self, _access_token: &str, notification_id: &str) -> ServiceResult<()> {
        self.calls.lock().unwrap().mark_read += 1;
        let mut feed = self.feed.lock().unwrap();
        if let Some(item) = feed.iter_mut().find(|n| n.id == notification_id) {
            if !item.read {
                item.read = true;
                let mut unread = self.unread.lock().unwrap();
                *unread = unread.saturating_sub(1);
            }
        }
        Ok(())
    }

    async fn mark_all_read(&self, _access_token: &str) -> ServiceResult<()> {
        self.calls.lock().unwrap().mark_all_read += 1;
        for item in self.feed.lock().unwrap().iter_mut() {
            item.read = true;
        }
        *self.unread.lock().unwrap() = 0;
        Ok(())
    }

    async fn validate_session(&self, _access_token: &str) -> ServiceResult<bool> {
        self.calls.lock().unwrap().validate += 1;
        Ok(self.accept_session.load(Ordering::SeqCst))
    }
}
