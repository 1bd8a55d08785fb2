use super::LoginError;
use crate::domain_model::{LoginRequest, LoginResult};

/// Turns credentials into a session. A successful parse is expected to have
/// written the session record into the shared cache under the returned token.
#[async_trait::async_trait]
pub trait LoginParser: Send + Sync {
    async fn parse(&self, request: LoginRequest) -> Result<LoginResult, LoginError>;
}
