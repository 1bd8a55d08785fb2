use super::AuthError;
use crate::domain_model::AccessedControls;

#[async_trait::async_trait]
pub trait ControlResolver: Send + Sync {
    async fn accessed_controls(&self, account: &str) -> Result<AccessedControls, AuthError>;
}
