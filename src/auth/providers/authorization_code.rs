use std::sync::Mutex;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::auth::error::AuthError;
use crate::auth::provider::TokenProvider;
use crate::auth::token::Token;
use crate::config::TOKEN_ENDPOINT;
use crate::error::Result;

/// Token provider backed by the Uhome OAuth authorization-code flow.
///
/// The first token is obtained by exchanging the authorization code; once a
/// token carrying a refresh token is cached, later exchanges use the refresh
/// grant. A cached token is reused until `now >= expires_at`.
///
/// Concurrent callers that observe an expired token at the same time may each
/// perform an exchange; the last response wins the cache.
///
/// # Example
/// ```no_run
/// use uhome::auth::{AuthorizationCodeProvider, TokenProvider};
///
/// # async fn example() -> uhome::error::Result<()> {
/// let provider = AuthorizationCodeProvider::new(reqwest::Client::new(), "client-id", "auth-code");
/// let token = provider.access_token().await?;
/// # Ok(())
/// # }
/// ```
pub struct AuthorizationCodeProvider {
    client: reqwest::Client,
    client_id: String,
    authorization_code: Option<String>,
    refresh_token: Option<String>,
    token_url: String,
    cached: Mutex<Option<Token>>,
}

/// Credential sent to the token endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Grant {
    AuthorizationCode(String),
    RefreshToken(String),
}

impl Grant {
    fn grant_type(&self) -> &'static str {
        match self {
            Self::AuthorizationCode(_) => "authorization_code",
            Self::RefreshToken(_) => "refresh_token",
        }
    }

    /// Refresh token sent with this grant, kept when the server does not
    /// rotate it.
    fn refresh_token(&self) -> Option<&str> {
        match self {
            Self::AuthorizationCode(_) => None,
            Self::RefreshToken(refresh) => Some(refresh),
        }
    }

    fn form<'a>(&'a self, client_id: &'a str) -> [(&'static str, &'a str); 3] {
        match self {
            Self::AuthorizationCode(code) => [
                ("grant_type", self.grant_type()),
                ("client_id", client_id),
                ("code", code.as_str()),
            ],
            Self::RefreshToken(refresh) => [
                ("grant_type", self.grant_type()),
                ("client_id", client_id),
                ("refresh_token", refresh.as_str()),
            ],
        }
    }
}

impl AuthorizationCodeProvider {
    pub fn new(
        client: reqwest::Client,
        client_id: impl Into<String>,
        authorization_code: impl Into<String>,
    ) -> Self {
        Self {
            client,
            client_id: client_id.into(),
            authorization_code: Some(authorization_code.into()),
            refresh_token: None,
            token_url: TOKEN_ENDPOINT.to_string(),
            cached: Mutex::new(None),
        }
    }

    /// Resume from a refresh token kept by the embedder.
    pub fn from_refresh_token(
        client: reqwest::Client,
        client_id: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self {
            client,
            client_id: client_id.into(),
            authorization_code: None,
            refresh_token: Some(refresh_token.into()),
            token_url: TOKEN_ENDPOINT.to_string(),
            cached: Mutex::new(None),
        }
    }

    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    /// Snapshot of the currently cached token.
    pub fn cached_token(&self) -> Option<Token> {
        self.cached.lock().ok().and_then(|guard| guard.clone())
    }

    fn select_grant(&self, cached: Option<&Token>) -> std::result::Result<Grant, AuthError> {
        if let Some(refresh) = cached.and_then(|t| t.refresh_token.clone()) {
            return Ok(Grant::RefreshToken(refresh));
        }
        if let Some(refresh) = &self.refresh_token {
            return Ok(Grant::RefreshToken(refresh.clone()));
        }
        if let Some(code) = &self.authorization_code {
            return Ok(Grant::AuthorizationCode(code.clone()));
        }
        Err(AuthError::MissingCredential)
    }

    async fn request_token(&self, grant: &Grant) -> std::result::Result<Token, AuthError> {
        let resp = self
            .client
            .post(&self.token_url)
            .form(&grant.form(&self.client_id))
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(
                grant_type = grant.grant_type(),
                status = status.as_u16(),
                "Uhome token request failed"
            );
            return Err(AuthError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let body = resp.text().await?;
        let raw: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| AuthError::InvalidResponse(format!("token response is not JSON: {e}")))?;
        let token = Token::from_response(raw)?;
        debug!(
            grant_type = grant.grant_type(),
            expires_at = %token.expires_at,
            "Obtained Uhome access token"
        );
        Ok(token)
    }

    fn store(&self, token: Token) {
        if let Ok(mut guard) = self.cached.lock() {
            *guard = Some(token);
        }
    }
}

#[async_trait]
impl TokenProvider for AuthorizationCodeProvider {
    async fn access_token(&self) -> Result<String> {
        let cached = self.cached_token();
        if let Some(token) = cached.as_ref().filter(|t| !t.is_expired()) {
            return Ok(token.access_token.clone());
        }
        let grant = self.select_grant(cached.as_ref())?;
        let mut token = self.request_token(&grant).await?;
        if token.refresh_token.is_none() {
            token.refresh_token = grant.refresh_token().map(str::to_string);
        }
        let access_token = token.access_token.clone();
        self.store(token);
        Ok(access_token)
    }
}
