use anyhow::{Result, anyhow};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub auth: Auth,
    pub login: Login,
    pub cache: Cache,
    pub session: Session,
    pub http: Http,
    pub log: Log,
}

#[derive(Debug, Deserialize)]
pub struct Auth {
    pub backend: String, // "local" or "fake"
}

#[derive(Debug, Deserialize)]
pub struct Login {
    pub backend: String, // "fake"
    pub session_ttl_secs: u64,
    pub return_url: String,
}

#[derive(Debug, Deserialize)]
pub struct Cache {
    pub backend: String, // "memory" or "redis"
    pub redis_dsn: Option<String>,
    pub prefix: String,
    pub sweep_interval_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct Session {
    pub controls_ttl_secs: u64,
    pub evict_controls_on_logout: bool,
}

#[derive(Debug, Deserialize)]
pub struct Http {
    pub address: String,
    pub cert_path: Option<String>,
    pub key_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Log {
    pub filter: String,
}

#[cfg(debug_assertions)]
const SETTINGS_PATH: &str = "settings/dev.toml";
#[cfg(not(debug_assertions))]
const SETTINGS_PATH: &str = "settings/release.toml";

pub fn parse_settings(path: Option<&str>) -> Result<Settings> {
    let path = path.unwrap_or(SETTINGS_PATH);
    build(defaults()?.add_source(File::with_name(path)))
}

fn defaults() -> Result<ConfigBuilder<DefaultState>> {
    Config::builder()
        .set_default("auth.backend", "local")?
        .set_default("login.backend", "fake")?
        .set_default("login.session_ttl_secs", 10_i64 * 60 * 60)?
        .set_default("login.return_url", "/")?
        .set_default("cache.backend", "memory")?
        .set_default("cache.prefix", "passport")?
        .set_default("cache.sweep_interval_secs", 60_i64)?
        .set_default("session.controls_ttl_secs", 10_i64 * 60)?
        .set_default("session.evict_controls_on_logout", false)?
        .set_default("http.address", "127.0.0.1:3030")?
        .set_default("log.filter", "info")
        .map_err(|e| anyhow!(e))
}

fn build(builder: ConfigBuilder<DefaultState>) -> Result<Settings> {
    let settings: Settings = builder
        .build()
        .map_err(|e| anyhow!(e))?
        .try_deserialize()
        .map_err(|e| anyhow!(e))?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn parse_str(toml: &str) -> Result<Settings> {
        build(defaults()?.add_source(File::from_str(toml, FileFormat::Toml)))
    }

    #[test]
    fn defaults_fill_missing_sections() {
        let settings = parse_str("").unwrap();
        assert_eq!(settings.auth.backend, "local");
        assert_eq!(settings.cache.backend, "memory");
        assert_eq!(settings.session.controls_ttl_secs, 600);
        assert!(!settings.session.evict_controls_on_logout);
        assert!(settings.cache.redis_dsn.is_none());
        assert!(settings.http.cert_path.is_none());
    }

    #[test]
    fn file_values_override_defaults() {
        let settings = parse_str(
            r#"
            [cache]
            backend = "redis"
            redis_dsn = "redis://127.0.0.1:6379"

            [session]
            evict_controls_on_logout = true

            [log]
            filter = "passport=debug"
            "#,
        )
        .unwrap();
        assert_eq!(settings.cache.backend, "redis");
        assert_eq!(settings.cache.redis_dsn.as_deref(), Some("redis://127.0.0.1:6379"));
        assert_eq!(settings.cache.prefix, "passport");
        assert!(settings.session.evict_controls_on_logout);
        assert_eq!(settings.log.filter, "passport=debug");
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(parse_settings(Some("settings/does-not-exist.toml")).is_err());
    }
}
