use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;

const FAKE_TOKEN_PREFIX: &str = "fake-token:";

#[derive(Debug)]
pub struct FakeAuthProvider;

impl FakeAuthProvider {
    pub fn new() -> Self {
        Self
    }

    fn account_of(token: &str) -> Option<&str> {
        token
            .strip_prefix(FAKE_TOKEN_PREFIX)
            .filter(|account| !account.is_empty())
    }
}

// Sessions live in the token itself: `fake-token:<account>` is always logged in.
#[async_trait::async_trait]
impl AuthProvider for FakeAuthProvider {
    async fn check_login(
        &self,
        ctx: &dyn RequestContext,
        token: Option<&str>,
        _other_info: &str,
    ) -> Result<bool, AuthError> {
        let token = match token.filter(|t| !t.is_empty()) {
            Some(token) => token.to_string(),
            None => extract_token(ctx),
        };
        Ok(Self::account_of(&token).is_some())
    }

    async fn current_user(
        &self,
        ctx: &dyn RequestContext,
        _other_info: &str,
    ) -> Result<AccessedControls, AuthError> {
        let token = extract_token(ctx);
        Ok(match Self::account_of(&token) {
            Some(account) => AccessedControls {
                account: account.to_string(),
                name: account.to_string(),
                ..AccessedControls::default()
            },
            None => AccessedControls::default(),
        })
    }

    async fn user_name(
        &self,
        ctx: &dyn RequestContext,
        _other_info: &str,
    ) -> Result<String, AuthError> {
        let token = extract_token(ctx);
        Ok(Self::account_of(&token).unwrap_or_default().to_string())
    }

    async fn try_login(
        &self,
        _app_key: &str,
        username: &str,
        _pwd: &str,
    ) -> Result<LoginResult, LoginError> {
        if username.is_empty() {
            return Err(LoginError::InvalidInput("account is empty".to_string()));
        }
        Ok(LoginResult {
            token: format!("{}{}", FAKE_TOKEN_PREFIX, username),
            return_url: "/".to_string(),
        })
    }

    async fn logout(&self, _ctx: &dyn RequestContext) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn ctx(token: &str) -> HttpRequestContext {
        let query = HashMap::from([(TOKEN_KEY.to_string(), token.to_string())]);
        HttpRequestContext::new(query, HashMap::new())
    }

    #[tokio::test]
    async fn login_issues_a_token_that_checks_out() {
        let provider = FakeAuthProvider::new();
        let result = provider.login("app", "carol", "whatever").await.unwrap();

        let request = ctx(&result.token);
        assert!(provider.check_login(&request, None, "").await.unwrap());
        assert_eq!(provider.user_name(&request, "").await.unwrap(), "carol");
        assert_eq!(provider.current_user(&request, "").await.unwrap().account, "carol");
    }

    #[tokio::test]
    async fn foreign_tokens_are_rejected() {
        let provider = FakeAuthProvider::new();
        let request = ctx("fake-token:");
        assert!(!provider.check_login(&request, None, "").await.unwrap());
        assert!(!provider.check_login(&ctx("abc"), None, "").await.unwrap());
        assert_eq!(provider.user_name(&ctx("abc"), "").await.unwrap(), "");
        assert!(provider.login("app", "", "pwd").await.is_none());
    }
}
