use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

pub const DEFAULT_EMAIL_PROVIDER: &str = "resend";
pub const DEFAULT_RESEND_API_URL: &str = "https://api.resend.com";

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub storage: StorageConfig,
    pub notification: NotificationConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            storage: StorageConfig {
                database_url: non_empty_var("DATABASE_URL"),
            },
            notification: NotificationConfig::from_env(),
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Location of the quotes table. Without a URL, submissions are not persisted.
#[derive(Debug, Clone, Default)]
pub struct StorageConfig {
    pub database_url: Option<String>,
}

/// Outbound email settings.
///
/// Missing addresses or keys fail the request that tries to send, not startup.
#[derive(Clone, Default)]
pub struct NotificationConfig {
    /// Lowercased provider name, `resend` unless overridden.
    pub provider: String,
    pub from: Option<String>,
    pub to: Option<String>,
    /// Value of `<PROVIDER>_API_KEY` for the active provider.
    pub api_key: Option<String>,
    pub resend_api_url: String,
    /// Echo the underlying notification error to API clients.
    pub debug_errors: bool,
}

impl NotificationConfig {
    pub fn from_env() -> Self {
        let provider = non_empty_var("EMAIL_PROVIDER")
            .map(|value| value.to_ascii_lowercase())
            .unwrap_or_else(|| DEFAULT_EMAIL_PROVIDER.to_string());
        let api_key = non_empty_var(&Self::api_key_var(&provider));

        Self {
            from: non_empty_var("EMAIL_FROM"),
            to: non_empty_var("EMAIL_TO"),
            api_key,
            resend_api_url: non_empty_var("RESEND_API_URL")
                .unwrap_or_else(|| DEFAULT_RESEND_API_URL.to_string()),
            debug_errors: non_empty_var("DEBUG_EMAIL_ERRORS")
                .map(|value| parse_flag(&value))
                .unwrap_or(false),
            provider,
        }
    }

    /// Name of the environment variable holding the key for `provider`.
    pub fn api_key_var(provider: &str) -> String {
        format!("{}_API_KEY", provider.to_ascii_uppercase())
    }
}

impl fmt::Debug for NotificationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationConfig")
            .field("provider", &self.provider)
            .field("from", &self.from)
            .field("to", &self.to)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("resend_api_url", &self.resend_api_url)
            .field("debug_errors", &self.debug_errors)
            .finish()
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    MissingDatabaseUrl,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::MissingDatabaseUrl => {
                write!(f, "DATABASE_URL must be set (or passed with --database-url)")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::MissingDatabaseUrl => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
