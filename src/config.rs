//! Command line and environment configuration for both tiers

use clap::{Args, Parser};
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

use crate::proxy::ProxyConfig;
use crate::simulator::SimulatorConfig;

pub const BACKEND_URL_VAR: &str = "BACKEND_URL";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("CRITICAL: {0} environment variable is not set!")]
    Missing(&'static str),

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, Args)]
pub struct LogArgs {
    /// Log level, overridden by RUST_LOG
    #[arg(long = "log-level", env = "LOG_LEVEL", default_value = "info")]
    pub level: String,

    /// Emit logs as JSON lines
    #[arg(long = "log-json", env = "LOG_JSON")]
    pub json: bool,
}

/// Back tier: chaos simulator service
#[derive(Debug, Clone, Parser)]
#[command(name = "chaoschain-backend")]
#[command(about = "Chaos simulator back tier", long_about = None)]
#[command(version)]
pub struct BackendArgs {
    /// Listen address
    #[arg(short, long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8081")]
    pub listen: String,

    /// Name reported in analysis payloads
    #[arg(long, env = "SERVICE_NAME", default_value = "chaoschain")]
    pub service_name: String,

    #[command(flatten)]
    pub log: LogArgs,
}

/// Front tier: proxy service
#[derive(Debug, Clone, Parser)]
#[command(name = "chaoschain-frontend")]
#[command(about = "Proxy front tier forwarding to the chaos simulator", long_about = None)]
#[command(version)]
pub struct FrontendArgs {
    /// Listen address
    #[arg(short, long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8080")]
    pub listen: String,

    /// Root URL of the back tier
    #[arg(long, env = BACKEND_URL_VAR)]
    pub backend_url: Option<String>,

    /// Connect and request timeout for backend calls, in milliseconds
    #[arg(long, env = "BACKEND_TIMEOUT_MS", default_value_t = 2000)]
    pub backend_timeout_ms: u64,

    #[command(flatten)]
    pub log: LogArgs,
}

#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub listen_addr: SocketAddr,
    pub simulator: SimulatorConfig,
}

#[derive(Debug, Clone)]
pub struct FrontendConfig {
    pub listen_addr: SocketAddr,
    pub proxy: ProxyConfig,
}

fn parse_listen(raw: &str) -> ConfigResult<SocketAddr> {
    raw.parse().map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
        field: "listen",
        reason: e.to_string(),
    })
}

impl BackendArgs {
    pub fn into_config(self) -> ConfigResult<BackendConfig> {
        Ok(BackendConfig {
            listen_addr: parse_listen(&self.listen)?,
            simulator: SimulatorConfig::with_service_name(self.service_name),
        })
    }
}

impl FrontendArgs {
    /// Validate into a runnable config; a missing backend URL is fatal
    pub fn into_config(self) -> ConfigResult<FrontendConfig> {
        let backend_url = self
            .backend_url
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::Missing(BACKEND_URL_VAR))?;

        if !backend_url.starts_with("http://") && !backend_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                field: "backend_url",
                reason: format!("expected an http(s) URL, got {backend_url}"),
            });
        }

        if self.backend_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "backend_timeout_ms",
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(FrontendConfig {
            listen_addr: parse_listen(&self.listen)?,
            proxy: ProxyConfig::new(backend_url.trim())
                .with_timeout(Duration::from_millis(self.backend_timeout_ms)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_defaults() {
        let args = BackendArgs::try_parse_from(["chaoschain-backend"]).unwrap();
        let config = args.into_config().unwrap();

        assert_eq!(config.listen_addr.port(), 8081);
        assert_eq!(config.simulator.service_name, "chaoschain");
    }

    #[test]
    fn test_backend_service_name() {
        let args = BackendArgs::try_parse_from([
            "chaoschain-backend",
            "--service-name",
            "quarkus",
            "--listen",
            "127.0.0.1:9000",
        ])
        .unwrap();
        let config = args.into_config().unwrap();

        assert_eq!(config.simulator.service_name, "quarkus");
        assert_eq!(config.listen_addr.port(), 9000);
    }

    #[test]
    fn test_frontend_requires_backend_url() {
        let args = FrontendArgs {
            listen: "0.0.0.0:8080".to_string(),
            backend_url: None,
            backend_timeout_ms: 2000,
            log: LogArgs {
                level: "info".to_string(),
                json: false,
            },
        };

        assert_eq!(
            args.clone().into_config().unwrap_err(),
            ConfigError::Missing("BACKEND_URL")
        );

        let blank = FrontendArgs {
            backend_url: Some("   ".to_string()),
            ..args
        };
        assert_eq!(
            blank.into_config().unwrap_err(),
            ConfigError::Missing("BACKEND_URL")
        );
    }

    #[test]
    fn test_frontend_config() {
        let args = FrontendArgs::try_parse_from([
            "chaoschain-frontend",
            "--backend-url",
            "http://backend:8081/",
            "--backend-timeout-ms",
            "500",
        ])
        .unwrap();
        let config = args.into_config().unwrap();

        assert_eq!(config.proxy.base_url, "http://backend:8081");
        assert_eq!(config.proxy.request_timeout, Duration::from_millis(500));
        assert_eq!(config.proxy.connect_timeout, Duration::from_millis(500));
        assert_eq!(config.listen_addr.port(), 8080);
    }

    #[test]
    fn test_frontend_rejects_bad_url() {
        let args = FrontendArgs::try_parse_from([
            "chaoschain-frontend",
            "--backend-url",
            "backend:8081",
        ])
        .unwrap();

        assert!(matches!(
            args.into_config(),
            Err(ConfigError::Invalid { field: "backend_url", .. })
        ));
    }

    #[test]
    fn test_invalid_listen_address() {
        let args =
            BackendArgs::try_parse_from(["chaoschain-backend", "--listen", "nope"]).unwrap();
        assert!(matches!(
            args.into_config(),
            Err(ConfigError::Invalid { field: "listen", .. })
        ));
    }
}
