use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use crate::logger::*;
use chrono::TimeDelta;
use nanoid::nanoid;
use std::sync::Arc;

const ACCEPTED_PASSWORD: &str = "123456";
const FAILING_PASSWORD: &str = "000000";

/// Development login parser: any account logs in with `123456`, and `000000`
/// simulates a backend failure. Sessions are written into the shared cache.
pub struct FakeLoginParser {
    cache: Arc<dyn CacheStore>,
    clock: Arc<dyn Clock>,
    session_ttl: TimeDelta,
    return_url: String,
}

impl FakeLoginParser {
    pub fn new(
        cache: Arc<dyn CacheStore>,
        clock: Arc<dyn Clock>,
        session_ttl: TimeDelta,
        return_url: impl Into<String>,
    ) -> Self {
        Self {
            cache,
            clock,
            session_ttl,
            return_url: return_url.into(),
        }
    }
}

#[async_trait::async_trait]
impl LoginParser for FakeLoginParser {
    async fn parse(&self, request: LoginRequest) -> Result<LoginResult, LoginError> {
        if request.app_key.is_empty() {
            return Err(LoginError::InvalidInput("app key is empty".to_string()));
        }
        if request.account.is_empty() || request.password.is_empty() {
            return Err(LoginError::InvalidInput(
                "account and password are required".to_string(),
            ));
        }
        match request.password.as_str() {
            ACCEPTED_PASSWORD => {}
            FAILING_PASSWORD => {
                return Err(LoginError::InternalError(
                    "simulated internal error".to_string(),
                ));
            }
            _ => return Err(LoginError::InvalidCredentials),
        }

        let now = self.clock.now();
        let session = UserAuthSession {
            token: nanoid!(),
            app_key: request.app_key,
            account: request.account.clone(),
            name: request.account,
            ip_address: String::new(),
            created_at: now,
        };
        self.cache
            .set(&session.token, &session, now + self.session_ttl)
            .await?;
        debug!(account = %session.account, "session written");

        Ok(LoginResult {
            token: session.token,
            return_url: self.return_url.clone(),
        })
    }
}
