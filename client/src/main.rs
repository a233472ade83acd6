//! Main entry point for the MentorHub client shell.
//!
//! This file initializes logging, loads configuration, wires the session and
//! notification stores together, and restores any persisted session before
//! handing control to the consumer surface. It orchestrates the
//! application's startup and defines its overall structure.

mod api;
mod config;
mod errors;
mod notifications;
mod session;
mod storage;

use crate::api::HttpApi;
use crate::notifications::store::NotificationStore;
use crate::session::store::SessionStore;
use crate::storage::SessionStorage;
use config::Config;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::fmt::init;

#[tokio::main]
async fn main() {
    init();

    let config = Config::from_env().unwrap();
    let api = Arc::new(HttpApi::new(&config).unwrap());
    let storage = SessionStorage::new(config.storage_dir.clone());

    let session = Arc::new(SessionStore::new(api.clone(), storage));
    let notifications = Arc::new(NotificationStore::new(api, config.poll_interval()));
    session.subscribe(notifications.clone()).await;

    match session.restore_session().await {
        Ok(Some(identity)) => info!("Resumed session for {}", identity.username),
        Ok(None) => info!("No persisted session; starting anonymous"),
        Err(e) => warn!("Session restore failed: {}", e),
    }

    info!("MentorHub client shell ready");

    tokio::signal::ctrl_c().await.unwrap();
    info!("Shutting down");
}
