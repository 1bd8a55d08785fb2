/// Walks a session through login, lookups and logout against the in-memory
/// cache, stepping a manual clock across the authorization view's expiry.
///
/// $ cargo run --bin session_demo
use chrono::{TimeDelta, Utc};
use passport::application_impl::*;
use passport::application_port::*;
use passport::domain_model::TOKEN_KEY;
use passport::domain_port::*;
use passport::infra_memory::*;
use passport::logger::*;
use std::collections::HashMap;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let logger = Logger::new_bootstrap();
    logger.reload_from_config(&LogConfig {
        filter: "passport=debug,session_demo=debug".to_string(),
    })?;

    let clock = Arc::new(ManualClock::new(Utc::now()));
    let cache: Arc<dyn CacheStore> = Arc::new(MemoryCacheStore::new(clock.clone()));
    let login_parser: Arc<dyn LoginParser> = Arc::new(FakeLoginParser::new(
        cache.clone(),
        clock.clone(),
        TimeDelta::hours(10),
        "/",
    ));
    let control_resolver: Arc<dyn ControlResolver> = Arc::new(FakeControlResolver::new());
    let auth_provider: Arc<dyn AuthProvider> = Arc::new(LocalAuthProvider::new(
        cache,
        login_parser,
        control_resolver,
        clock.clone(),
        SessionOptions::default(),
    ));

    let rejected = auth_provider.login("demo-app", "alice", "wrong").await;
    info!(?rejected, "login with a wrong password");

    let result = auth_provider
        .login("demo-app", "alice", "123456")
        .await
        .ok_or_else(|| anyhow::anyhow!("login failed"))?;
    info!(token = %result.token, "logged in");

    let cookies = HashMap::from([(TOKEN_KEY.to_string(), result.token.clone())]);
    let request = HttpRequestContext::new(HashMap::new(), cookies);

    let logged_in = auth_provider.check_login(&request, None, "").await?;
    let user_name = auth_provider.user_name(&request, "").await?;
    info!(logged_in, %user_name, "session lookup");

    let controls = auth_provider.current_user(&request, "").await?;
    info!(modules = controls.modules.len(), "authorization view resolved");

    clock.advance(TimeDelta::minutes(11));
    let controls = auth_provider.current_user(&request, "").await?;
    info!(
        modules = controls.modules.len(),
        "authorization view resolved again after expiry"
    );

    let logged_out = auth_provider.logout(&request).await;
    let logged_in = auth_provider.check_login(&request, None, "").await?;
    info!(logged_out, logged_in, "logged out");

    Ok(())
}
