//! Durable client-local storage for the persisted session.
//!
//! The session store is the only writer here. The three durable keys (access
//! token, refresh token, serialized identity) live in a single JSON document
//! that is written atomically as a group via a temp file rename. Logout
//! clears the whole storage directory, not just the session document.

use crate::session::models::{ActiveSession, CredentialPair, Identity};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::warn;

const SESSION_FILE: &str = "session.json";

/// Persisted session document: the three durable keys written as a group.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedSession {
    access_token: String,
    refresh_token: String,
    identity: Identity,
}

/// File-backed storage rooted at a directory owned by this application.
#[derive(Debug, Clone)]
pub struct SessionStorage {
    dir: PathBuf,
}

impl SessionStorage {
    /// Creates storage rooted at `dir`. The directory is created lazily on
    /// the first write.
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn session_path(&self) -> PathBuf {
        self.dir.join(SESSION_FILE)
    }

    /// Persists the session document. The rename makes the write atomic: a
    /// crash mid-write leaves either the old document or none, never a torn
    /// one.
    pub fn save(&self, session: &ActiveSession) -> Result<()> {
        fs::create_dir_all(&self.dir).with_context(|| format!("creating {}", self.dir.display()))?;

        let doc = PersistedSession {
            access_token: session.credentials.access_token.clone(),
            refresh_token: session.credentials.refresh_token.clone(),
            identity: session.identity.clone(),
        };
        let json = serde_json::to_string_pretty(&doc).context("serializing session")?;

        let tmp = self.dir.join(format!("{SESSION_FILE}.tmp"));
        fs::write(&tmp, json).with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, self.session_path())
            .with_context(|| format!("committing {}", self.session_path().display()))?;

        Ok(())
    }

    /// Loads the persisted session, if any. A malformed document is treated
    /// as absent: boot-time restoration degrades to anonymous rather than
    /// failing startup.
    pub fn load(&self) -> Result<Option<ActiveSession>> {
        let path = self.session_path();
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).with_context(|| format!("reading {}", path.display())),
        };

        match serde_json::from_str::<PersistedSession>(&json) {
            Ok(doc) => Ok(Some(ActiveSession {
                identity: doc.identity,
                credentials: CredentialPair {
                    access_token: doc.access_token,
                    refresh_token: doc.refresh_token,
                },
            })),
            Err(e) => {
                warn!("Discarding malformed persisted session: {}", e);
                Ok(None)
            }
        }
    }

    /// Removes every entry under the storage directory, not just the session
    /// document. Logout is a hard reset of all client-local state.
    pub fn clear_all(&self) -> Result<()> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e).with_context(|| format!("reading {}", self.dir.display())),
        };

        for entry in entries {
            let entry = entry.with_context(|| format!("reading {}", self.dir.display()))?;
            let path = entry.path();
            if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                fs::remove_dir_all(&path)
                    .with_context(|| format!("removing {}", path.display()))?;
            } else {
                fs::remove_file(&path).with_context(|| format!("removing {}", path.display()))?;
            }
        }

        Ok(())
    }
}
