//! Data structures for authentication-related entities.
//!
//! This module defines models for the authenticated identity, the credential
//! pair issued by the remote authority, and the login request/response
//! payloads used for data transfer within the session flow.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

/// Role of the authenticated principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Mentor,
    Student,
}

/// The authenticated principal's profile and role.
///
/// An identity is present if and only if a credential pair is held; absence
/// of an identity means there is no active session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    /// Server-extensible fields, carried verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Access and refresh token issued by the remote authority on login.
///
/// Both tokens are persisted and cleared together with the identity; neither
/// is ever retained without the other once a session exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Login request payload
#[derive(Debug, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login response containing tokens and the identity payload
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: Identity,
}

/// The unit published to session subscribers: who is logged in plus the
/// credential needed to act on their behalf.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveSession {
    pub identity: Identity,
    pub credentials: CredentialPair,
}
