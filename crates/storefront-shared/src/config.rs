//! Configuration management

use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use config::builder::DefaultState;
use serde::Deserialize;

use crate::constants::{
    DEFAULT_CLEANUP_INTERVAL_SECONDS, DEFAULT_LOGOUT_REDIRECT, DEFAULT_SESSION_COOKIE,
    DEFAULT_SESSION_TTL_SECONDS,
};
use crate::error::AppError;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseSettings,
    pub session: SessionSettings,
    pub redis: RedisSettings,
    pub audit: AuditSettings,
    pub cors: CorsSettings,
    pub telemetry: TelemetrySettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub env: String,
    pub host: String,
    pub port: u16,
    pub name: String,
    /// Take the client address from `X-Forwarded-For` / `X-Real-IP`.
    pub trust_proxy_headers: bool,
}

/// Connection parameters for the relational store.
///
/// `charset` is sent to the server as `client_encoding`.
#[derive(Deserialize, Clone)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub charset: String,
    pub username: String,
    pub password: String,
    pub max_connections: u32,
    pub acquire_timeout_seconds: u64,
    pub run_migrations: bool,
}

// Hand-written so the password never reaches a log line.
impl std::fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("charset", &self.charset)
            .field("username", &self.username)
            .field("password", &"***")
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout_seconds", &self.acquire_timeout_seconds)
            .field("run_migrations", &self.run_migrations)
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionBackend {
    Memory,
    Postgres,
    Redis,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "Strict",
            Self::Lax => "Lax",
            Self::None => "None",
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionSettings {
    pub backend: SessionBackend,
    pub cookie_name: String,
    pub cookie_path: String,
    pub cookie_domain: Option<String>,
    pub cookie_secure: bool,
    pub cookie_http_only: bool,
    pub cookie_same_site: SameSite,
    /// Zero means a browser-session cookie (no `Max-Age`).
    pub cookie_lifetime_seconds: i64,
    pub use_cookies: bool,
    pub ttl_seconds: i64,
    pub cleanup_interval_seconds: u64,
    pub logout_redirect: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            backend: SessionBackend::Memory,
            cookie_name: DEFAULT_SESSION_COOKIE.to_string(),
            cookie_path: "/".to_string(),
            cookie_domain: None,
            cookie_secure: false,
            cookie_http_only: true,
            cookie_same_site: SameSite::Lax,
            cookie_lifetime_seconds: 0,
            use_cookies: true,
            ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
            cleanup_interval_seconds: DEFAULT_CLEANUP_INTERVAL_SECONDS,
            logout_redirect: DEFAULT_LOGOUT_REDIRECT.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RedisSettings {
    pub url: String,
    pub max_connections: usize,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AuditMode {
    Direct,
    Queued,
    Disabled,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuditSettings {
    pub mode: AuditMode,
    pub queue_capacity: usize,
    pub batch_size: usize,
    pub batch_timeout_ms: u64,
    pub worker_count: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorsSettings {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelemetrySettings {
    pub filter: String,
    pub json: bool,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub log_dir: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let config = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::default()
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Builds a config from defaults overlaid with a TOML document.
    pub fn from_toml(toml: &str) -> Result<Self, AppError> {
        let config = Self::defaults()?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, AppError> {
        let builder = Config::builder()
            .set_default("app.env", "development")?
            .set_default("app.host", "127.0.0.1")?
            .set_default("app.port", 8080)?
            .set_default("app.name", "storefront-session")?
            .set_default("app.trust_proxy_headers", false)?
            .set_default("database.host", "127.0.0.1")?
            .set_default("database.port", 5432)?
            .set_default("database.name", "storefront")?
            .set_default("database.charset", "UTF8")?
            .set_default("database.username", "storefront")?
            .set_default("database.password", "")?
            .set_default("database.max_connections", 10)?
            .set_default("database.acquire_timeout_seconds", 3)?
            .set_default("database.run_migrations", false)?
            .set_default("session.backend", "memory")?
            .set_default("session.cookie_name", DEFAULT_SESSION_COOKIE)?
            .set_default("session.cookie_path", "/")?
            .set_default("session.cookie_secure", false)?
            .set_default("session.cookie_http_only", true)?
            .set_default("session.cookie_same_site", "lax")?
            .set_default("session.cookie_lifetime_seconds", 0)?
            .set_default("session.use_cookies", true)?
            .set_default("session.ttl_seconds", DEFAULT_SESSION_TTL_SECONDS)?
            .set_default("session.cleanup_interval_seconds", DEFAULT_CLEANUP_INTERVAL_SECONDS)?
            .set_default("session.logout_redirect", DEFAULT_LOGOUT_REDIRECT)?
            .set_default("redis.url", "redis://127.0.0.1:6379")?
            .set_default("redis.max_connections", 16)?
            .set_default("audit.mode", "direct")?
            .set_default("audit.queue_capacity", 10_000)?
            .set_default("audit.batch_size", 100)?
            .set_default("audit.batch_timeout_ms", 1000)?
            .set_default("audit.worker_count", 2)?
            .set_default("cors.allowed_origins", Vec::<String>::new())?
            .set_default("telemetry.filter", "info")?
            .set_default("telemetry.json", true)?;
        Ok(builder)
    }

    fn validate(&self) -> Result<(), AppError> {
        let session = &self.session;

        if session.cookie_name.is_empty()
            || !session
                .cookie_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(AppError::InvalidConfig(format!(
                "session.cookie_name '{}' is not a valid cookie name",
                session.cookie_name
            )));
        }

        if session.ttl_seconds <= 0 {
            return Err(AppError::InvalidConfig(
                "session.ttl_seconds must be positive".to_string(),
            ));
        }

        if !session.logout_redirect.starts_with('/') {
            return Err(AppError::InvalidConfig(
                "session.logout_redirect must be a local path".to_string(),
            ));
        }

        if session.cookie_same_site == SameSite::None && !session.cookie_secure {
            return Err(AppError::InvalidConfig(
                "session.cookie_same_site = none requires session.cookie_secure".to_string(),
            ));
        }

        if self.audit.mode == AuditMode::Queued
            && (self.audit.worker_count == 0 || self.audit.batch_size == 0)
        {
            return Err(AppError::InvalidConfig(
                "audit.worker_count and audit.batch_size must be positive in queued mode"
                    .to_string(),
            ));
        }

        Ok(())
    }

    /// True when any configured component talks to the relational store.
    pub fn needs_database(&self) -> bool {
        self.session.backend == SessionBackend::Postgres
            || matches!(self.audit.mode, AuditMode::Direct | AuditMode::Queued)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.app.port, 8080);
        assert_eq!(config.session.backend, SessionBackend::Memory);
        assert_eq!(config.session.cookie_name, DEFAULT_SESSION_COOKIE);
        assert_eq!(config.session.logout_redirect, "/?page=landing&logout=success");
        assert_eq!(config.database.charset, "UTF8");
        assert_eq!(config.audit.mode, AuditMode::Direct);
        assert!(config.session.use_cookies);
        assert!(config.needs_database());
    }

    #[test]
    fn test_overrides_from_toml() {
        let config = AppConfig::from_toml(
            r#"
            [session]
            backend = "redis"
            cookie_same_site = "strict"
            cookie_domain = "shop.example.com"
            use_cookies = false

            [audit]
            mode = "disabled"
            "#,
        )
        .unwrap();

        assert_eq!(config.session.backend, SessionBackend::Redis);
        assert_eq!(config.session.cookie_same_site, SameSite::Strict);
        assert_eq!(config.session.cookie_domain.as_deref(), Some("shop.example.com"));
        assert!(!config.session.use_cookies);
        assert!(!config.needs_database());
    }

    #[test]
    fn test_rejects_external_logout_redirect() {
        let result = AppConfig::from_toml(
            r#"
            [session]
            logout_redirect = "https://evil.example.com/"
            "#,
        );
        assert!(matches!(result, Err(AppError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_same_site_none_without_secure() {
        let result = AppConfig::from_toml(
            r#"
            [session]
            cookie_same_site = "none"
            "#,
        );
        assert!(matches!(result, Err(AppError::InvalidConfig(_))));
    }

    #[test]
    fn test_database_debug_masks_password() {
        let config = AppConfig::from_toml(
            r#"
            [database]
            password = "hunter2"
            "#,
        )
        .unwrap();
        let rendered = format!("{:?}", config.database);
        assert!(!rendered.contains("hunter2"));
    }
}
