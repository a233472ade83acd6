//! Client boundary to the remote management API.
//!
//! The stores talk to the remote authority exclusively through [`RemoteApi`],
//! which keeps the HTTP plumbing in one place and lets tests run the stores
//! against an in-memory double.

pub mod http;
#[cfg(test)]
pub mod mock;

pub use http::HttpApi;

use crate::errors::ServiceResult;
use crate::notifications::models::Notification;
use crate::session::models::{LoginRequest, LoginResponse};
use async_trait::async_trait;
use serde_json::Value;

/// Remote authority surface required by the session and notification stores.
///
/// Every method is an asynchronous I/O boundary; the identity behind the
/// feed operations is inferred server-side from the access token.
#[async_trait]
pub trait RemoteApi: Send + Sync {
    /// Exchanges credentials for a token pair and an identity payload.
    async fn login(&self, request: &LoginRequest) -> ServiceResult<LoginResponse>;

    /// Forwards an arbitrary registration payload. Registration does not
    /// imply login; accounts go through an approval workflow and require a
    /// manual login afterwards.
    async fn register(&self, payload: &Value) -> ServiceResult<Value>;

    /// Ordered notification feed for the credential's identity.
    async fn list_notifications(&self, access_token: &str) -> ServiceResult<Vec<Notification>>;

    /// Server-computed unread count.
    async fn unread_count(&self, access_token: &str) -> ServiceResult<u64>;

    /// Marks a single notification read.
    async fn mark_read(&self, access_token: &str, notification_id: &str) -> ServiceResult<()>;

    /// Marks the entire feed read.
    async fn mark_all_read(&self, access_token: &str) -> ServiceResult<()>;

    /// Lightweight probe reporting whether the credential is still accepted
    /// by the remote authority.
    async fn validate_session(&self, access_token: &str) -> ServiceResult<bool>;
}
