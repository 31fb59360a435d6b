use thiserror::Error;

use crate::error::UhomeError;

/// Failures raised while obtaining or validating OAuth tokens.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Error retrieving access token: {0}")]
    Denied(String),
    #[error("Invalid token response: {0}")]
    InvalidResponse(String),
    #[error("No credential available to request a token")]
    MissingCredential,
    #[error("Token request failed with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl From<AuthError> for UhomeError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::Status { status, body } => UhomeError::Transport { status, body },
            AuthError::Network(e) => UhomeError::Network(e),
            other => UhomeError::Authentication(other.to_string()),
        }
    }
}
