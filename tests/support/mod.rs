#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use uhome::auth::{StaticTokenProvider, TokenProvider};
use uhome::client::ApiClient;
use uhome::error::{Result, UhomeError};
use wiremock::{MockServer, Request, Respond, ResponseTemplate};

/// Replies with `payload`, echoing the request's `header.messageId`.
pub struct EchoResponder {
    payload: Value,
}

impl EchoResponder {
    pub fn new(payload: Value) -> Self {
        Self { payload }
    }
}

impl Respond for EchoResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);
        let header = body.get("header").cloned().unwrap_or(Value::Null);
        ResponseTemplate::new(200).set_body_json(json!({
            "header": {
                "namespace": header["namespace"],
                "name": header["name"],
                "messageId": header["messageId"],
                "payloadVersion": header["payloadVersion"],
            },
            "payload": self.payload,
        }))
    }
}

/// Provider that always fails, counting how often it was asked.
#[derive(Default)]
pub struct FailingProvider {
    pub calls: AtomicUsize,
}

#[async_trait]
impl TokenProvider for FailingProvider {
    async fn access_token(&self) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(UhomeError::Authentication("no token".to_string()))
    }
}

pub fn static_client(server: &MockServer, token: &str) -> ApiClient {
    ApiClient::new(reqwest::Client::new(), Arc::new(StaticTokenProvider::new(token)))
        .with_action_url(format!("{}/action", server.uri()))
}

/// JSON bodies of every request the server received, in order.
pub async fn received_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| serde_json::from_slice(&r.body).expect("request body is JSON"))
        .collect()
}
