//! Interactive authorization-code login for the CLI.

use std::io::{BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use crate::auth::{AuthorizationCodeProvider, AuthorizationRequest};
use crate::client::ApiClient;
use crate::config::UhomeConfig;
use crate::error::{Result, UhomeError};

use super::CredentialArgs;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Resolve configuration: command-line flags over env over config file.
pub fn resolve_config(args: &CredentialArgs) -> Result<UhomeConfig> {
    let file = match &args.config {
        Some(path) => UhomeConfig::from_file(path)?,
        None => match UhomeConfig::default_path() {
            Some(path) => UhomeConfig::from_file(&path)?,
            None => UhomeConfig::new(),
        },
    };
    let flags = UhomeConfig {
        client_id: args.client_id.clone(),
        client_secret: args.client_secret.clone(),
        redirect_uri: args.redirect_uri.clone(),
        ..Default::default()
    };
    Ok(flags.merge(UhomeConfig::from_env()).merge(file))
}

/// Ask for any credential still missing from `config`.
pub fn prompt_missing<R: BufRead, W: Write>(
    config: &mut UhomeConfig,
    input: &mut R,
    output: &mut W,
) -> Result<()> {
    if config.client_id.is_none() {
        config.set_client_id(prompt(input, output, "Enter Client ID:")?);
    }
    if config.client_secret.is_none() {
        config.set_client_secret(prompt(input, output, "Enter Client Secret:")?);
    }
    if config.redirect_uri.is_none() {
        config.set_redirect_uri(prompt(input, output, "Enter RedirectUri:")?);
    }
    Ok(())
}

/// Build the authorize request for a fully populated `config`.
pub fn authorization_request(config: &UhomeConfig) -> Result<AuthorizationRequest> {
    let missing = |field: &str| UhomeError::Configuration(format!("{field} is not set"));
    Ok(AuthorizationRequest::builder()
        .client_id(config.require_client_id()?)
        .client_secret(config.client_secret.as_deref().ok_or_else(|| missing("client secret"))?)
        .redirect_uri(config.redirect_uri.as_deref().ok_or_else(|| missing("redirect uri"))?)
        .authorize_url(config.authorize_url())
        .build())
}

/// Prompt for missing credentials, show the authorize URL and return the
/// code from the pasted redirect.
pub fn authorize_interactively<R: BufRead, W: Write>(
    config: &mut UhomeConfig,
    input: &mut R,
    output: &mut W,
) -> Result<String> {
    prompt_missing(config, input, output)?;
    let request = authorization_request(config)?;
    read_authorization_code(&request, input, output)
}

/// Show `request`'s authorize URL and validate the redirect pasted back.
pub fn read_authorization_code<R: BufRead, W: Write>(
    request: &AuthorizationRequest,
    input: &mut R,
    output: &mut W,
) -> Result<String> {
    writeln!(output, "Open this URL to authorize access:\n{}", request.url()?)?;
    let redirect = prompt(input, output, "Paste full redirect uri:")?;
    let code = request.extract_code(&redirect)?;
    writeln!(output)?;
    Ok(code)
}

/// Run the authorization-code dance against stdin/stdout and return a
/// ready-to-use client.
pub async fn login(args: &CredentialArgs) -> Result<ApiClient> {
    let mut config = resolve_config(args)?;
    let (config, code) = on_terminal(move || {
        let mut input = std::io::stdin().lock();
        let code = authorize_interactively(&mut config, &mut input, &mut std::io::stdout())?;
        Ok((config, code))
    })
    .await?;
    connect(&config, code)
}

/// Run terminal I/O on the blocking pool so prompts never stall a runtime
/// worker.
pub async fn on_terminal<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        UhomeError::Io(std::io::Error::other(format!("terminal prompt failed: {e}")))
    })?
}

/// Build a client that exchanges `code` on its first call.
pub fn connect(config: &UhomeConfig, code: String) -> Result<ApiClient> {
    let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
    let tokens = AuthorizationCodeProvider::new(http.clone(), config.require_client_id()?, code)
        .with_token_url(config.token_url());
    Ok(ApiClient::from_config(http, Arc::new(tokens), config))
}

fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W, label: &str) -> Result<String> {
    write!(output, "{label} ")?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(UhomeError::InvalidInput(format!(
            "no input for \"{}\"",
            label.trim_end_matches(':')
        )));
    }
    Ok(line.trim().to_string())
}
