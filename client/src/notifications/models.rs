//! Data structures for the notification feed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single feed item as returned by the remote authority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    pub read: bool,
    /// Optional navigation target attached by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Server-assigned creation time. Feed order comes from the response
    /// (most-recent-first) and is never re-sorted client-side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Unread counter response.
///
/// The server's count is authoritative; the client mirrors it rather than
/// deriving it from cached read flags, which may be a truncated view of the
/// full feed.
#[derive(Debug, Deserialize)]
pub struct UnreadCountResponse {
    pub count: u64,
}
