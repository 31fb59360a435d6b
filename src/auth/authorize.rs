//! Browser-side half of the authorization-code flow.

use bon::Builder;
use url::Url;

use crate::config::{API_SCOPE, AUTHORIZE_ENDPOINT};
use crate::error::{Result, UhomeError};

/// Parameters of an authorize redirect, plus the `state` used to bind the
/// redirect back to this request.
///
/// # Example
/// ```
/// use uhome::auth::AuthorizationRequest;
///
/// let request = AuthorizationRequest::builder()
///     .client_id("client")
///     .client_secret("secret")
///     .redirect_uri("https://example.com/cb")
///     .state("S1")
///     .build();
/// let url = request.url()?;
/// assert!(url.contains("state=S1"));
/// assert_eq!(request.extract_code("https://example.com/cb?code=ABC&state=S1")?, "ABC");
/// # Ok::<(), uhome::error::UhomeError>(())
/// ```
#[derive(Debug, Clone, Builder)]
pub struct AuthorizationRequest {
    #[builder(into)]
    pub client_id: String,
    #[builder(into)]
    pub client_secret: String,
    #[builder(into)]
    pub redirect_uri: String,
    #[builder(into, default = AUTHORIZE_ENDPOINT.to_string())]
    pub authorize_url: String,
    #[builder(into, default = generate_state())]
    pub state: String,
}

impl AuthorizationRequest {
    /// Full authorize URL to open in a browser.
    pub fn url(&self) -> Result<String> {
        let url = Url::parse_with_params(
            &self.authorize_url,
            &[
                ("response_type", "code"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("scope", API_SCOPE),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("state", self.state.as_str()),
            ],
        )
        .map_err(|e| {
            UhomeError::Configuration(format!(
                "invalid authorize URL {}: {e}",
                self.authorize_url
            ))
        })?;
        Ok(url.into())
    }

    /// Validate a pasted redirect URI against this request's state and
    /// return the authorization code.
    pub fn extract_code(&self, redirect: &str) -> Result<String> {
        extract_authorization_code(redirect, &self.state)
    }
}

/// Extract the authorization code from a redirect URI.
///
/// The redirect must carry exactly one non-empty `code` and exactly one
/// non-empty `state`, and `state` must equal `expected_state`.
pub fn extract_authorization_code(redirect: &str, expected_state: &str) -> Result<String> {
    let url = parse_redirect(redirect.trim()).map_err(|e| {
        UhomeError::InvalidInput(format!("Authorization response is not a valid URL: {e}"))
    })?;
    if url.query().map_or(true, str::is_empty) {
        return Err(UhomeError::InvalidInput(
            "Authorization response does not contain a query string".to_string(),
        ));
    }

    let code = single_param(&url, "code").ok_or_else(|| {
        UhomeError::InvalidInput(
            "Authorization response has an invalid code query parameter".to_string(),
        )
    })?;
    let state = single_param(&url, "state").ok_or_else(|| {
        UhomeError::InvalidInput(
            "Authorization response has an invalid state query parameter".to_string(),
        )
    })?;
    if state != expected_state {
        return Err(UhomeError::InvalidInput(
            "Authorization response has an inconsistent state value".to_string(),
        ));
    }
    Ok(code)
}

/// Parse an absolute redirect, or a path-and-query one such as
/// `/cb?code=...&state=...` resolved against a placeholder origin.
fn parse_redirect(redirect: &str) -> std::result::Result<Url, url::ParseError> {
    match Url::parse(redirect) {
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse(RELATIVE_REDIRECT_BASE)?.join(redirect)
        }
        other => other,
    }
}

const RELATIVE_REDIRECT_BASE: &str = "http://localhost/";

/// Value of `key` when it appears exactly once with a non-empty value.
fn single_param(url: &Url, key: &str) -> Option<String> {
    let mut values = url
        .query_pairs()
        .filter(|(k, v)| k == key && !v.is_empty())
        .map(|(_, v)| v.into_owned());
    let first = values.next()?;
    match values.next() {
        Some(_) => None,
        None => Some(first),
    }
}

fn generate_state() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
