//! Notification module for the cached feed and its polling lifecycle.
//!
//! This module provides the public interface for reading the cached
//! notification feed, marking items read and keeping the cache fresh while a
//! session is active.

pub mod models;
pub mod store;
