use serde::Deserialize;
use std::env;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} must be a valid {expected}, got {value:?}")]
    Invalid {
        key: &'static str,
        expected: &'static str,
        value: String,
    },
}

// Top-level configuration, one section per concern
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub catalog: CatalogConfig,
    pub sessions: SessionConfig,
}

// Server settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub rust_log: String,
    pub cors_allow_origin: Option<String>,
}

// Mock catalog settings
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    pub simulate_latency: bool,
    pub latency_factor: f64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            simulate_latency: true,
            latency_factor: 1.0,
        }
    }
}

// One week
pub const MAX_IDLE_TIMEOUT_MINUTES: i64 = 7 * 24 * 60;
pub const MAX_CLEANUP_INTERVAL_SECONDS: u64 = 24 * 60 * 60;

// Booking session housekeeping
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub idle_timeout_minutes: i64,
    pub cleanup_interval_seconds: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout_minutes: 30,
            cleanup_interval_seconds: 300,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            app: AppConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
                environment: "development".to_string(),
                rust_log: "cinema_booking=debug,tower_http=debug".to_string(),
                cors_allow_origin: None,
            },
            catalog: CatalogConfig::default(),
            sessions: SessionConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Config {
            app: AppConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_var("PORT", "8000", "port number")?,
                environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
                rust_log: env::var("RUST_LOG")
                    .unwrap_or_else(|_| "cinema_booking=debug,tower_http=debug".to_string()),
                cors_allow_origin: env::var("CORS_ALLOW_ORIGIN").ok().filter(|s| !s.is_empty()),
            },
            catalog: CatalogConfig {
                simulate_latency: parse_var("CATALOG_SIMULATE_LATENCY", "true", "boolean")?,
                latency_factor: parse_latency_factor()?,
            },
            sessions: SessionConfig {
                idle_timeout_minutes: parse_bounded(
                    "SESSION_IDLE_TIMEOUT_MINUTES",
                    "30",
                    1,
                    MAX_IDLE_TIMEOUT_MINUTES,
                    "number of minutes between 1 and 10080",
                )?,
                cleanup_interval_seconds: parse_bounded(
                    "SESSION_CLEANUP_INTERVAL_SECONDS",
                    "300",
                    1,
                    MAX_CLEANUP_INTERVAL_SECONDS,
                    "number of seconds between 1 and 86400",
                )?,
            },
        })
    }

    pub fn is_production(&self) -> bool {
        self.app.environment.eq_ignore_ascii_case("production")
    }
}

fn parse_var<T: FromStr>(
    key: &'static str,
    default: &str,
    expected: &'static str,
) -> Result<T, ConfigError> {
    let raw = env::var(key).unwrap_or_else(|_| default.to_string());
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        expected,
        value: raw,
    })
}

fn parse_bounded<T>(
    key: &'static str,
    default: &str,
    min: T,
    max: T,
    expected: &'static str,
) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + ToString,
{
    let value: T = parse_var(key, default, expected)?;
    if value < min || value > max {
        return Err(ConfigError::Invalid {
            key,
            expected,
            value: value.to_string(),
        });
    }
    Ok(value)
}

fn parse_latency_factor() -> Result<f64, ConfigError> {
    let factor: f64 = parse_var("CATALOG_LATENCY_FACTOR", "1.0", "non-negative number")?;
    if !factor.is_finite() || factor < 0.0 {
        return Err(ConfigError::Invalid {
            key: "CATALOG_LATENCY_FACTOR",
            expected: "non-negative number",
            value: factor.to_string(),
        });
    }
    Ok(factor)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env vars are process-wide, so every env-touching assertion lives in one test
    #[test]
    fn reads_defaults_and_rejects_garbage() {
        for key in [
            "PORT",
            "HOST",
            "CATALOG_SIMULATE_LATENCY",
            "CATALOG_LATENCY_FACTOR",
            "CORS_ALLOW_ORIGIN",
            "SESSION_IDLE_TIMEOUT_MINUTES",
            "SESSION_CLEANUP_INTERVAL_SECONDS",
        ] {
            env::remove_var(key);
        }

        let config = Config::from_env().unwrap();
        assert_eq!(config.app.port, 8000);
        assert_eq!(config.app.host, "0.0.0.0");
        assert!(config.catalog.simulate_latency);
        assert_eq!(config.catalog.latency_factor, 1.0);
        assert!(config.app.cors_allow_origin.is_none());
        assert_eq!(config.sessions.idle_timeout_minutes, 30);

        env::set_var("PORT", "not-a-port");
        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("PORT"));
        env::remove_var("PORT");

        env::set_var("CATALOG_LATENCY_FACTOR", "-2");
        assert!(Config::from_env().is_err());
        env::set_var("CATALOG_LATENCY_FACTOR", "0.25");
        assert_eq!(Config::from_env().unwrap().catalog.latency_factor, 0.25);
        env::remove_var("CATALOG_LATENCY_FACTOR");

        for bad in ["0", "-5", "10081", "9223372036854775807"] {
            env::set_var("SESSION_IDLE_TIMEOUT_MINUTES", bad);
            let err = Config::from_env().unwrap_err();
            assert!(err.to_string().contains("SESSION_IDLE_TIMEOUT_MINUTES"), "{bad} accepted");
        }
        env::set_var("SESSION_IDLE_TIMEOUT_MINUTES", "10080");
        assert_eq!(Config::from_env().unwrap().sessions.idle_timeout_minutes, 10_080);
        env::remove_var("SESSION_IDLE_TIMEOUT_MINUTES");

        for bad in ["0", "86401", "-1"] {
            env::set_var("SESSION_CLEANUP_INTERVAL_SECONDS", bad);
            assert!(Config::from_env().is_err(), "{bad} accepted");
        }
        env::set_var("SESSION_CLEANUP_INTERVAL_SECONDS", "60");
        assert_eq!(Config::from_env().unwrap().sessions.cleanup_interval_seconds, 60);
        env::remove_var("SESSION_CLEANUP_INTERVAL_SECONDS");
    }
}
