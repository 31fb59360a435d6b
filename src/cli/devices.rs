//! CLI device command handlers.

use serde_json::Value;

use crate::client::{device_ids, ApiClient, LockAction};
use crate::error::Result;

use super::session::{authorization_request, login, on_terminal, prompt_missing, resolve_config};
use super::CredentialArgs;

/// Handle `uhome devices`: discover, then query every discovered device.
pub async fn handle_devices(args: &CredentialArgs) -> Result<()> {
    let api = login(args).await?;
    let devices = api.discover_devices().await?;
    println!("=== U home Devices ===");
    print_json(&devices)?;

    let ids = device_ids(&devices)?;
    let states = api.query_devices(&ids).await?;
    print_json(&states)
}

/// Handle `uhome lock` / `uhome unlock`.
pub async fn handle_lock(
    args: &CredentialArgs,
    device_ids: &[String],
    action: LockAction,
) -> Result<()> {
    let api = login(args).await?;
    let response = send_lock(&api, device_ids, action).await?;
    print_json(&response)
}

/// Handle `uhome authorize-url`.
pub async fn handle_authorize_url(args: &CredentialArgs) -> Result<()> {
    let mut config = resolve_config(args)?;
    let config = on_terminal(move || {
        prompt_missing(&mut config, &mut std::io::stdin().lock(), &mut std::io::stdout())?;
        Ok(config)
    })
    .await?;
    let request = authorization_request(&config)?;
    println!("{}", request.url()?);
    println!("state: {}", request.state);
    Ok(())
}

async fn send_lock(api: &ApiClient, device_ids: &[String], action: LockAction) -> Result<Value> {
    match action {
        LockAction::Lock => api.lock_devices(device_ids).await,
        LockAction::Unlock => api.unlock_devices(device_ids).await,
    }
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
