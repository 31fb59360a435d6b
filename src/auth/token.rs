use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::error::AuthError;

/// OAuth token issued by the Uhome token endpoint.
///
/// # Example
/// ```
/// use uhome::auth::Token;
/// use serde_json::json;
///
/// let token = Token::from_response(json!({
///     "access_token": "access",
///     "refresh_token": "refresh",
///     "expires_in": 3600
/// }))?;
/// assert_eq!(token.access_token, "access");
/// assert!(!token.is_expired());
/// # Ok::<(), uhome::auth::AuthError>(())
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
    /// Full token-endpoint response the token was built from.
    pub raw: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: i64,
}

impl Token {
    /// Build a token from a token-endpoint JSON body, stamping the expiry
    /// relative to now.
    pub fn from_response(raw: serde_json::Value) -> Result<Self, AuthError> {
        Self::from_response_at(raw, Utc::now())
    }

    /// Build a token from a token-endpoint JSON body issued at `issued_at`.
    pub fn from_response_at(
        raw: serde_json::Value,
        issued_at: DateTime<Utc>,
    ) -> Result<Self, AuthError> {
        if let Some(error) = raw.get("error") {
            let message = match error.as_str() {
                Some(text) => text.to_string(),
                None => error.to_string(),
            };
            return Err(AuthError::Denied(message));
        }
        let parsed: TokenResponse = serde_json::from_value(raw.clone())
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;
        let expires_at = expiry(issued_at, parsed.expires_in).ok_or_else(|| {
            AuthError::InvalidResponse(format!("invalid expires_in: {}", parsed.expires_in))
        })?;
        Ok(Self {
            access_token: parsed.access_token,
            refresh_token: parsed.refresh_token,
            expires_at,
            raw,
        })
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// `issued_at + lifetime_secs`, or `None` for a negative or unrepresentable
/// lifetime.
fn expiry(issued_at: DateTime<Utc>, lifetime_secs: i64) -> Option<DateTime<Utc>> {
    if lifetime_secs < 0 {
        return None;
    }
    issued_at.checked_add_signed(Duration::try_seconds(lifetime_secs)?)
}
