use crate::domain_model::{AccessedControls, LoginResult};
use crate::domain_port::{CacheError, RequestContext};
use crate::logger::*;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),
    #[error("authorization lookup failed: {0}")]
    Authorization(String),
    #[error("internal error: {0}")]
    InternalError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("unknown application: {0}")]
    UnknownApp(String),
    #[error("store error: {0}")]
    Store(String),
    #[error("internal error: {0}")]
    InternalError(String),
}

impl From<CacheError> for LoginError {
    fn from(err: CacheError) -> Self {
        match err {
            CacheError::Store(e) => LoginError::Store(e),
            CacheError::Codec(e) => LoginError::InternalError(e),
            CacheError::InternalError(e) => LoginError::InternalError(e.to_string()),
        }
    }
}

/// An authentication provider. Request-scoped operations take the request
/// context explicitly; `other_info` carries provider-specific data and may
/// be ignored.
#[async_trait::async_trait]
pub trait AuthProvider: Send + Sync {
    /// A non-empty `token` takes precedence over the one carried by `ctx`.
    async fn check_login(
        &self,
        ctx: &dyn RequestContext,
        token: Option<&str>,
        other_info: &str,
    ) -> Result<bool, AuthError>;

    /// Returns the empty view when the request carries no live session.
    async fn current_user(
        &self,
        ctx: &dyn RequestContext,
        other_info: &str,
    ) -> Result<AccessedControls, AuthError>;

    /// Returns an empty string when the request carries no live session.
    async fn user_name(&self, ctx: &dyn RequestContext, other_info: &str)
    -> Result<String, AuthError>;

    async fn try_login(
        &self,
        app_key: &str,
        username: &str,
        pwd: &str,
    ) -> Result<LoginResult, LoginError>;

    /// Like `try_login`, with every failure collapsed to `None`.
    async fn login(&self, app_key: &str, username: &str, pwd: &str) -> Option<LoginResult> {
        match self.try_login(app_key, username, pwd).await {
            Ok(result) => Some(result),
            Err(e) => {
                warn!(app_key, account = username, error = %e, "login failed");
                None
            }
        }
    }

    /// Never fails; a store failure is reported as `false`.
    async fn logout(&self, ctx: &dyn RequestContext) -> bool;
}
