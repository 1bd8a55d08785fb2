use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_port::*;
use crate::infra_memory::*;
use crate::infra_redis::*;
use crate::logger::*;
use crate::settings::Settings;
use anyhow::anyhow;
use chrono::TimeDelta;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub struct Server {
    pub auth_provider: Arc<dyn AuthProvider>,
    sweeper_handle: Mutex<Option<JoinHandle<()>>>,
    cancel: CancellationToken,
}

impl Server {
    pub async fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let mut memory_store = None;
        let cache: Arc<dyn CacheStore> = match settings.cache.backend.as_str() {
            "memory" => {
                let store = Arc::new(MemoryCacheStore::new(clock.clone()));
                memory_store = Some(store.clone());
                store
            }
            "redis" => {
                let dsn = settings
                    .cache
                    .redis_dsn
                    .as_deref()
                    .ok_or_else(|| anyhow!("cache.redis_dsn is required by the redis backend"))?;
                let redis_client = redis::Client::open(dsn)?;
                let redis_manager = redis_client.get_connection_manager().await?;
                Arc::new(RedisCacheStore::new(
                    redis_manager,
                    settings.cache.prefix.clone(),
                ))
            }
            other => return Err(anyhow!("Unknown cache backend: {}", other)),
        };

        let login_parser: Arc<dyn LoginParser> = match settings.login.backend.as_str() {
            "fake" => Arc::new(FakeLoginParser::new(
                cache.clone(),
                clock.clone(),
                seconds(settings.login.session_ttl_secs)?,
                settings.login.return_url.clone(),
            )),
            other => return Err(anyhow!("Unknown login backend: {}", other)),
        };
        let control_resolver: Arc<dyn ControlResolver> = Arc::new(FakeControlResolver::new());

        let options = SessionOptions {
            controls_ttl: seconds(settings.session.controls_ttl_secs)?,
            evict_controls_on_logout: settings.session.evict_controls_on_logout,
        };
        let auth_provider: Arc<dyn AuthProvider> = match settings.auth.backend.as_str() {
            "local" => Arc::new(LocalAuthProvider::new(
                cache,
                login_parser,
                control_resolver,
                clock,
                options,
            )),
            "fake" => Arc::new(FakeAuthProvider::new()),
            other => return Err(anyhow!("Unknown auth backend: {}", other)),
        };

        let cancel = CancellationToken::new();
        let sweeper_handle = memory_store.map(|store| {
            let interval = Duration::from_secs(settings.cache.sweep_interval_secs.max(1));
            tokio::spawn(store.run_sweeper(interval, cancel.clone()))
        });

        info!(
            auth = %settings.auth.backend,
            cache = %settings.cache.backend,
            "server started"
        );

        Ok(Self {
            auth_provider,
            sweeper_handle: Mutex::new(sweeper_handle),
            cancel,
        })
    }

    /// Server around a ready-made provider, with no background tasks.
    pub fn with_provider(auth_provider: Arc<dyn AuthProvider>) -> Self {
        Self {
            auth_provider,
            sweeper_handle: Mutex::new(None),
            cancel: CancellationToken::new(),
        }
    }

    pub async fn shutdown(&self) {
        info!("server shutting down...");

        self.cancel.cancel();

        let handle = self
            .sweeper_handle
            .lock()
            .ok()
            .and_then(|mut lock| lock.take());
        if let Some(handle) = handle {
            let r = handle.await;
            info!("sweeper handle dropped: {:?}", r);
        }
    }
}

fn seconds(secs: u64) -> anyhow::Result<TimeDelta> {
    TimeDelta::try_seconds(i64::try_from(secs)?)
        .ok_or_else(|| anyhow!("duration out of range: {}s", secs))
}
