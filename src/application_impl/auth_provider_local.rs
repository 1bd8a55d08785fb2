use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use crate::logger::*;
use chrono::TimeDelta;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Freshness window of a cached authorization view.
    pub controls_ttl: TimeDelta,
    /// Also drop `<token>_CTRLS` on logout. Off by default, which leaves the
    /// view readable until it expires.
    pub evict_controls_on_logout: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            controls_ttl: TimeDelta::minutes(10),
            evict_controls_on_logout: false,
        }
    }
}

/// Authentication provider backed by the shared session cache.
pub struct LocalAuthProvider {
    cache: Arc<dyn CacheStore>,
    login_parser: Arc<dyn LoginParser>,
    control_resolver: Arc<dyn ControlResolver>,
    clock: Arc<dyn Clock>,
    options: SessionOptions,
}

impl LocalAuthProvider {
    pub fn new(
        cache: Arc<dyn CacheStore>,
        login_parser: Arc<dyn LoginParser>,
        control_resolver: Arc<dyn ControlResolver>,
        clock: Arc<dyn Clock>,
        options: SessionOptions,
    ) -> Self {
        LocalAuthProvider {
            cache,
            login_parser,
            control_resolver,
            clock,
            options,
        }
    }

    async fn session(&self, token: &str) -> Result<Option<UserAuthSession>, AuthError> {
        if token.is_empty() {
            return Ok(None);
        }
        Ok(self.cache.get::<UserAuthSession>(token).await?)
    }
}

#[async_trait::async_trait]
impl AuthProvider for LocalAuthProvider {
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
        Ok(self.session(&token).await?.is_some())
    }

    async fn current_user(
        &self,
        ctx: &dyn RequestContext,
        _other_info: &str,
    ) -> Result<AccessedControls, AuthError> {
        let token = extract_token(ctx);
        let Some(session) = self.session(&token).await? else {
            return Ok(AccessedControls::default());
        };

        let key = controls_key(&token);
        if let Some(controls) = self.cache.get::<AccessedControls>(&key).await? {
            return Ok(controls);
        }

        debug!(account = %session.account, "authorization view missing, resolving");
        let controls = self
            .control_resolver
            .accessed_controls(&session.account)
            .await?;
        let expire_at = self.clock.now() + self.options.controls_ttl;
        self.cache.set(&key, &controls, expire_at).await?;
        Ok(controls)
    }

    async fn user_name(
        &self,
        ctx: &dyn RequestContext,
        _other_info: &str,
    ) -> Result<String, AuthError> {
        let token = extract_token(ctx);
        Ok(self
            .session(&token)
            .await?
            .map(|session| session.account)
            .unwrap_or_default())
    }

    async fn try_login(
        &self,
        app_key: &str,
        username: &str,
        pwd: &str,
    ) -> Result<LoginResult, LoginError> {
        let request = LoginRequest {
            app_key: app_key.to_string(),
            account: username.to_string(),
            password: pwd.to_string(),
        };
        let result = self.login_parser.parse(request).await?;
        info!(app_key, account = username, "login succeeded");
        Ok(result)
    }

    async fn logout(&self, ctx: &dyn RequestContext) -> bool {
        let token = extract_token(ctx);
        if token.is_empty() {
            return true;
        }

        if let Err(e) = self.cache.remove(&token).await {
            warn!(error = %e, "failed to remove session on logout");
            return false;
        }

        if self.options.evict_controls_on_logout {
            if let Err(e) = self.cache.remove(&controls_key(&token)).await {
                warn!(error = %e, "failed to remove authorization view on logout");
            }
        }
        true
    }
}
