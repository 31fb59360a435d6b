//! OAuth token providers and authorization-code helpers.

pub mod authorize;
pub mod error;
pub mod provider;
pub mod providers;
pub mod token;

pub use authorize::{extract_authorization_code, AuthorizationRequest};
pub use error::AuthError;
pub use provider::TokenProvider;
pub use providers::authorization_code::AuthorizationCodeProvider;
pub use providers::static_token::StaticTokenProvider;
pub use token::Token;
