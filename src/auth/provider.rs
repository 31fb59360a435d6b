use async_trait::async_trait;

use crate::error::Result;

/// Source of bearer credentials for Uhome API calls.
///
/// Implementations decide how a token is obtained (authorization-code
/// exchange, refresh, a pre-shared token, ...). The returned string must be
/// usable as a bearer credential for the request that immediately follows.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use uhome::auth::TokenProvider;
///
/// struct EnvToken;
///
/// #[async_trait]
/// impl TokenProvider for EnvToken {
///     async fn access_token(&self) -> uhome::error::Result<String> {
///         std::env::var("UHOME_ACCESS_TOKEN")
///             .map_err(|_| uhome::error::UhomeError::Authentication("UHOME_ACCESS_TOKEN not set".into()))
///     }
/// }
/// ```
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Return a valid access token, obtaining a new one if needed.
    async fn access_token(&self) -> Result<String>;
}
