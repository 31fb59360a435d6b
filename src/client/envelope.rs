//! Action request/response envelopes.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use strum::{Display, EnumString};
use uuid::Uuid;

use crate::error::{Result, UhomeError};

/// Namespace for every device operation.
pub const DEVICE_NAMESPACE: &str = "Uhome.Device";

/// Capability addressed by lock/unlock commands.
pub const LOCK_CAPABILITY: &str = "st.lock";

/// Operation names understood by the action endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum OperationName {
    Discovery,
    Query,
    Command,
}

/// Lock capability commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LockAction {
    Lock,
    Unlock,
}

/// Header of an action request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestHeader {
    pub namespace: String,
    pub name: String,
    pub message_id: String,
    pub payload_version: String,
}

/// Body POSTed to the action endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestEnvelope {
    pub header: RequestHeader,
    pub payload: Value,
}

impl RequestEnvelope {
    /// Build an envelope with a freshly generated message id.
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        payload_version: impl Into<String>,
        payload: Value,
    ) -> Self {
        Self {
            header: RequestHeader {
                namespace: namespace.into(),
                name: name.into(),
                message_id: Uuid::new_v4().to_string(),
                payload_version: payload_version.into(),
            },
            payload,
        }
    }

    pub fn message_id(&self) -> &str {
        &self.header.message_id
    }

    /// Check that `response` echoes this envelope's message id.
    pub fn validate_response(&self, response: &Value) -> Result<()> {
        let echoed = response
            .get("header")
            .ok_or_else(|| UhomeError::Protocol("response has no header".to_string()))?
            .get("messageId")
            .ok_or_else(|| UhomeError::Protocol("response header has no messageId".to_string()))?;
        if echoed.as_str() != Some(self.message_id()) {
            return Err(UhomeError::Protocol(format!(
                "messageId mismatch: sent {}, received {echoed}",
                self.message_id()
            )));
        }
        Ok(())
    }
}

/// `{"devices": [{"id": ..}, ..]}` in input order.
pub fn query_payload<S: AsRef<str>>(device_ids: &[S]) -> Value {
    let devices: Vec<Value> = device_ids
        .iter()
        .map(|id| json!({ "id": id.as_ref() }))
        .collect();
    json!({ "devices": devices })
}

/// Lock/unlock command payload for each device, in input order.
pub fn lock_payload<S: AsRef<str>>(device_ids: &[S], action: LockAction) -> Value {
    let devices: Vec<Value> = device_ids
        .iter()
        .map(|id| {
            json!({
                "id": id.as_ref(),
                "command": { "capability": LOCK_CAPABILITY, "name": action.to_string() },
            })
        })
        .collect();
    json!({ "devices": devices })
}

/// Device ids listed in a discovery response (`payload.devices[*].id`).
pub fn device_ids(discovery: &Value) -> Result<Vec<String>> {
    let devices = discovery
        .pointer("/payload/devices")
        .and_then(Value::as_array)
        .ok_or_else(|| UhomeError::Protocol("discovery payload has no devices list".to_string()))?;
    devices
        .iter()
        .map(|device| {
            device
                .get("id")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| UhomeError::Protocol(format!("device without id: {device}")))
        })
        .collect()
}
