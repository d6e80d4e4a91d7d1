use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::workflows::readiness::UserProfile;

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
    pub coach: CoachConfig,
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

        let default_region =
            env::var("HOMEKEY_DEFAULT_REGION").unwrap_or_else(|_| "27610".to_string());
        let raw_down_payment =
            env::var("HOMEKEY_DEFAULT_DOWN_PAYMENT_PCT").unwrap_or_else(|_| "3".to_string());
        let default_down_payment_pct = raw_down_payment
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|pct| (0.0..=100.0).contains(pct))
            .ok_or(ConfigError::InvalidDownPayment(raw_down_payment))?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            coach: CoachConfig {
                default_region,
                default_down_payment_pct,
            },
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

/// Fallbacks applied when the intake conversation or an import leaves a field blank.
#[derive(Debug, Clone, PartialEq)]
pub struct CoachConfig {
    pub default_region: String,
    pub default_down_payment_pct: f64,
}

impl CoachConfig {
    /// Fill the down payment and region a caller left unset.
    pub fn fill_profile_defaults(&self, mut profile: UserProfile) -> UserProfile {
        if profile.down_payment_pct.is_none() {
            profile.down_payment_pct = Some(self.default_down_payment_pct);
        }
        if profile.region.is_none() {
            profile.region = Some(self.default_region.clone());
        }
        profile
    }
}

impl Default for CoachConfig {
    fn default() -> Self {
        Self {
            default_region: "27610".to_string(),
            default_down_payment_pct: 3.0,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidDownPayment(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidDownPayment(raw) => write!(
                f,
                "HOMEKEY_DEFAULT_DOWN_PAYMENT_PCT must be a percentage between 0 and 100 (got '{raw}')"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidDownPayment(_) => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_HOST");
        env::remove_var("APP_PORT");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("HOMEKEY_DEFAULT_REGION");
        env::remove_var("HOMEKEY_DEFAULT_DOWN_PAYMENT_PCT");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.coach, CoachConfig::default());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn rejects_invalid_port() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_PORT", "not-a-port");
        let error = AppConfig::load().expect_err("port must be numeric");
        assert!(matches!(error, ConfigError::InvalidPort));
        reset_env();
    }

    #[test]
    fn reads_coach_overrides() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "ci");
        env::set_var("HOMEKEY_DEFAULT_REGION", "27601");
        env::set_var("HOMEKEY_DEFAULT_DOWN_PAYMENT_PCT", "5");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.environment, AppEnvironment::Test);
        assert_eq!(config.coach.default_region, "27601");
        assert_eq!(config.coach.default_down_payment_pct, 5.0);
        reset_env();
    }

    #[test]
    fn fills_only_missing_profile_fields() {
        let config = CoachConfig {
            default_region: "27601".to_string(),
            default_down_payment_pct: 5.0,
        };

        let filled = config.fill_profile_defaults(UserProfile::default());
        assert_eq!(filled.down_payment_pct, Some(5.0));
        assert_eq!(filled.region.as_deref(), Some("27601"));

        let explicit = config.fill_profile_defaults(UserProfile {
            down_payment_pct: Some(0.0),
            region: Some("27701".to_string()),
            ..UserProfile::default()
        });
        assert_eq!(explicit.down_payment_pct, Some(0.0));
        assert_eq!(explicit.region.as_deref(), Some("27701"));
    }

    #[test]
    fn rejects_out_of_range_down_payment() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("HOMEKEY_DEFAULT_DOWN_PAYMENT_PCT", "140");
        let error = AppConfig::load().expect_err("down payment above 100 rejected");
        assert!(matches!(error, ConfigError::InvalidDownPayment(ref raw) if raw == "140"));
        reset_env();
    }
}
