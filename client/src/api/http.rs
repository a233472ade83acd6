//! reqwest-backed implementation of the remote API boundary.
//!
//! Maps transport failures and remote rejections into the service error
//! taxonomy, surfacing the remote error payload verbatim when one is
//! present.

use crate::api::RemoteApi;
use crate::config::Config;
use crate::errors::{ServiceError, ServiceResult};
use crate::notifications::models::{Notification, UnreadCountResponse};
use crate::session::models::{LoginRequest, LoginResponse};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;

/// HTTP client for the remote authority.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    /// Creates a new HttpApi instance from configuration.
    pub fn new(config: &Config) -> ServiceResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|err| {
                ServiceError::internal_error(format!("HTTP client setup failed: {}", err))
            })?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Extracts the remote error payload from a rejection response, if the
    /// body is JSON.
    async fn error_payload(response: Response) -> Option<Value> {
        response.json::<Value>().await.ok()
    }

    /// Human-readable message from a remote error payload, falling back to a
    /// generic one when the payload is absent or malformed.
    fn payload_message(payload: Option<&Value>, fallback: &str) -> String {
        payload
            .and_then(|p| p.get("error").or_else(|| p.get("message")))
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string())
    }

    async fn require_feed_success(response: Response, what: &str) -> ServiceResult<Response> {
        if !response.status().is_success() {
            return Err(ServiceError::feed_sync(format!(
                "{} failed with status {}",
                what,
                response.status()
            )));
        }
        Ok(response)
    }
}

#[async_trait]
impl RemoteApi for HttpApi {
    async fn login(&self, request: &LoginRequest) -> ServiceResult<LoginResponse> {
        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(request)
            .send()
            .await
            .map_err(|err| {
                ServiceError::authentication(format!("Login request failed: {}", err), None)
            })?;

        if !response.status().is_success() {
            let payload = Self::error_payload(response).await;
            let message = Self::payload_message(payload.as_ref(), "Invalid credentials");
            return Err(ServiceError::authentication(message, payload));
        }

        response.json::<LoginResponse>().await.map_err(|err| {
            ServiceError::authentication(format!("Malformed login response: {}", err), None)
        })
    }

    async fn register(&self, payload: &Value) -> ServiceResult<Value> {
        let response = self
            .client
            .post(self.url("/auth/register"))
            .json(payload)
            .send()
            .await
            .map_err(|err| {
                ServiceError::registration(format!("Registration request failed: {}", err), None)
            })?;

        if !response.status().is_success() {
            let payload = Self::error_payload(response).await;
            let message = Self::payload_message(payload.as_ref(), "Registration rejected");
            return Err(ServiceError::registration(message, payload));
        }

        response.json::<Value>().await.map_err(|err| {
            ServiceError::registration(format!("Malformed registration response: {}", err), None)
        })
    }

    async fn list_notifications(&self, access_token: &str) -> ServiceResult<Vec<Notification>> {
        let response = self
            .client
            .get(self.url("/api/notifications"))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|err| {
                ServiceError::feed_sync(format!("Notification list request failed: {}", err))
            })?;

        let response = Self::require_feed_success(response, "Notification list").await?;

        response.json::<Vec<Notification>>().await.map_err(|err| {
            ServiceError::feed_sync(format!("Malformed notification list: {}", err))
        })
    }

    async fn unread_count(&self, access_token: &str) -> ServiceResult<u64> {
        let response = self
            .client
            .get(self.url("/api/notifications/unread-count"))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|err| {
                ServiceError::feed_sync(format!("Unread count request failed: {}", err))
            })?;

        let response = Self::require_feed_success(response, "Unread count").await?;

        let count = response.json::<UnreadCountResponse>().await.map_err(|err| {
            ServiceError::feed_sync(format!("Malformed unread count: {}", err))
        })?;
        Ok(count.count)
    }

    async fn mark_read(&self, access_token: &str, notification_id: &str) -> ServiceResult<()> {
        let response = self
            .client
            .post(self.url(&format!("/api/notifications/{}/read", notification_id)))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|err| {
                ServiceError::feed_sync(format!("Mark-read request failed: {}", err))
            })?;

        Self::require_feed_success(response, "Mark-read").await?;
        Ok(())
    }

    async fn mark_all_read(&self, access_token: &str) -> ServiceResult<()> {
        let response = self
            .client
            .post(self.url("/api/notifications/read-all"))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|err| {
                ServiceError::feed_sync(format!("Mark-all-read request failed: {}", err))
            })?;

        Self::require_feed_success(response, "Mark-all-read").await?;
        Ok(())
    }

    async fn validate_session(&self, access_token: &str) -> ServiceResult<bool> {
        let response = self
            .client
            .get(self.url("/auth/me"))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|err| {
                ServiceError::internal_error(format!("Session probe failed: {}", err))
            })?;

        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(false),
            status => Err(ServiceError::internal_error(format!(
                "Session probe failed with status {}",
                status
            ))),
        }
    }
}
