//! Convenience re-exports for common use.

pub use crate::auth::{
    AuthorizationCodeProvider, AuthorizationRequest, StaticTokenProvider, TokenProvider,
};
pub use crate::client::{ApiClient, LockAction};
pub use crate::config::UhomeConfig;
pub use crate::error::{Result, UhomeError};
