//! Uhome OpenAPI client.

pub mod envelope;

pub use envelope::{
    device_ids, lock_payload, query_payload, LockAction, OperationName, RequestEnvelope,
    RequestHeader, DEVICE_NAMESPACE, LOCK_CAPABILITY,
};

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::auth::TokenProvider;
use crate::config::{UhomeConfig, ACTION_ENDPOINT, DEFAULT_PAYLOAD_VERSION};
use crate::error::{Result, UhomeError};

/// Client for the Uhome action endpoint.
///
/// The `reqwest::Client` is owned by the caller; cloning it shares its
/// connection pool. Every call asks the [`TokenProvider`] for a token, so any
/// caching happens in the provider.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use uhome::auth::StaticTokenProvider;
/// use uhome::client::ApiClient;
///
/// # async fn example() -> uhome::error::Result<()> {
/// let api = ApiClient::new(reqwest::Client::new(), Arc::new(StaticTokenProvider::new("token")));
/// let devices = api.discover_devices().await?;
/// let ids = uhome::client::device_ids(&devices)?;
/// let states = api.query_devices(&ids).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    tokens: Arc<dyn TokenProvider>,
    action_url: String,
    payload_version: String,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("action_url", &self.action_url)
            .field("payload_version", &self.payload_version)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(http: reqwest::Client, tokens: Arc<dyn TokenProvider>) -> Self {
        Self {
            http,
            tokens,
            action_url: ACTION_ENDPOINT.to_string(),
            payload_version: DEFAULT_PAYLOAD_VERSION.to_string(),
        }
    }

    /// Build a client using the endpoint and payload version from `config`.
    pub fn from_config(
        http: reqwest::Client,
        tokens: Arc<dyn TokenProvider>,
        config: &UhomeConfig,
    ) -> Self {
        Self::new(http, tokens)
            .with_action_url(config.action_url())
            .with_payload_version(config.payload_version())
    }

    pub fn with_action_url(mut self, url: impl Into<String>) -> Self {
        self.action_url = url.into();
        self
    }

    pub fn with_payload_version(mut self, version: impl Into<String>) -> Self {
        self.payload_version = version.into();
        self
    }

    /// List the devices linked to the account.
    pub async fn discover_devices(&self) -> Result<Value> {
        self.send(DEVICE_NAMESPACE, OperationName::Discovery, json!({}))
            .await
    }

    /// Query the current state of each device.
    pub async fn query_devices<S: AsRef<str>>(&self, device_ids: &[S]) -> Result<Value> {
        self.send(
            DEVICE_NAMESPACE,
            OperationName::Query,
            query_payload(device_ids),
        )
        .await
    }

    pub async fn lock_devices<S: AsRef<str>>(&self, device_ids: &[S]) -> Result<Value> {
        self.send_lock(device_ids, LockAction::Lock).await
    }

    pub async fn unlock_devices<S: AsRef<str>>(&self, device_ids: &[S]) -> Result<Value> {
        self.send_lock(device_ids, LockAction::Unlock).await
    }

    async fn send_lock<S: AsRef<str>>(&self, device_ids: &[S], action: LockAction) -> Result<Value> {
        self.send(
            DEVICE_NAMESPACE,
            OperationName::Command,
            lock_payload(device_ids, action),
        )
        .await
    }

    /// Send one action envelope and return the full validated response body.
    ///
    /// Fails with [`UhomeError::Transport`] on a non-success status and with
    /// [`UhomeError::Protocol`] when the response does not echo the request's
    /// `messageId`. Nothing is retried.
    pub async fn send(
        &self,
        namespace: &str,
        name: impl std::fmt::Display,
        payload: Value,
    ) -> Result<Value> {
        let access_token = self.tokens.access_token().await?;
        let envelope = RequestEnvelope::new(
            namespace,
            name.to_string(),
            self.payload_version.as_str(),
            payload,
        );
        debug!(
            namespace = %envelope.header.namespace,
            name = %envelope.header.name,
            message_id = %envelope.message_id(),
            "Sending Uhome action"
        );

        let resp = self
            .http
            .post(&self.action_url)
            .headers(bearer_headers(&access_token)?)
            .json(&envelope)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(
                name = %envelope.header.name,
                message_id = %envelope.message_id(),
                status = status.as_u16(),
                "Uhome action failed"
            );
            return Err(UhomeError::transport(status.as_u16(), body));
        }

        let body = resp.text().await?;
        let response: Value = serde_json::from_str(&body)?;
        envelope.validate_response(&response)?;
        Ok(response)
    }
}

fn bearer_headers(access_token: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    let value = HeaderValue::from_str(&format!("Bearer {access_token}")).map_err(|_| {
        UhomeError::Authentication("access token is not a valid header value".to_string())
    })?;
    headers.insert(AUTHORIZATION, value);
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_headers_set_json_and_authorization() {
        let headers = bearer_headers("abc").unwrap();
        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert_eq!(headers[AUTHORIZATION], "Bearer abc");
    }

    #[test]
    fn bearer_headers_reject_control_characters() {
        assert!(matches!(
            bearer_headers("bad\ntoken"),
            Err(UhomeError::Authentication(_))
        ));
    }

    #[test]
    fn from_config_applies_overrides() {
        let config = UhomeConfig {
            api_base_url: Some("http://localhost:1234".to_string()),
            payload_version: Some("2".to_string()),
            ..Default::default()
        };
        let api = ApiClient::from_config(
            reqwest::Client::new(),
            Arc::new(crate::auth::StaticTokenProvider::new("t")),
            &config,
        );
        assert_eq!(api.action_url, "http://localhost:1234/action");
        assert_eq!(api.payload_version, "2");
    }
}
