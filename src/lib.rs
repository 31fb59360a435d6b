//! uhome: Rust client for the U-tec Uhome OpenAPI.
//!
//! Two pieces do the work: a [`TokenProvider`](auth::TokenProvider) that
//! hands out valid OAuth access tokens, and an [`ApiClient`](client::ApiClient)
//! that wraps each call in the Uhome action envelope and checks that the
//! response echoes the request's `messageId`.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use uhome::prelude::*;
//!
//! # async fn example() -> uhome::error::Result<()> {
//! let http = reqwest::Client::new();
//! let tokens = AuthorizationCodeProvider::new(http.clone(), "client-id", "authorization-code");
//! let api = ApiClient::new(http, Arc::new(tokens));
//!
//! let devices = api.discover_devices().await?;
//! let states = api.query_devices(&uhome::client::device_ids(&devices)?).await?;
//! println!("{states}");
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod prelude;

#[cfg(feature = "cli")]
pub mod cli;
