//! Concrete [`TokenProvider`](crate::auth::TokenProvider) strategies.

pub mod authorization_code;
pub mod static_token;
