//! Session module for managing identity, credentials, and access control.
//!
//! This module provides the public interface for session-related
//! functionality such as login, registration, logout and boot-time session
//! restoration.

pub mod models;
pub mod store;
