use std::env;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_BACKEND_URL: &str = "https://localhost:7162/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend_url: String,
    pub backend_timeout_secs: u64,
    pub default_branch_id: i64,
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            backend_timeout_secs: DEFAULT_TIMEOUT_SECS,
            default_branch_id: 1,
            port: 3000,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let config = Self {
            backend_url: env::var("HMS_BACKEND_URL")
                .unwrap_or_else(|_| {
                    warn!("HMS_BACKEND_URL not set, using default");
                    defaults.backend_url.clone()
                }),
            backend_timeout_secs: parse_var("BACKEND_TIMEOUT_SECS", defaults.backend_timeout_secs),
            default_branch_id: parse_var("DEFAULT_BRANCH_ID", defaults.default_branch_id),
            port: parse_var("GATEWAY_PORT", defaults.port),
        };

        if !config.is_configured() {
            warn!("Gateway not fully configured - falling back to the local development backend");
        }

        config
    }

    /// True when the backend address was supplied explicitly rather than defaulted.
    pub fn is_configured(&self) -> bool {
        !self.backend_url.is_empty() && self.backend_url != DEFAULT_BACKEND_URL
    }

    pub fn backend_timeout(&self) -> Duration {
        Duration::from_secs(self.backend_timeout_secs)
    }

    pub fn with_backend_url(mut self, url: impl Into<String>) -> Self {
        self.backend_url = url.into();
        self
    }
}

fn parse_var<T: std::str::FromStr + Copy + std::fmt::Display>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} has invalid value {:?}, using default {}", name, raw, default);
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_points_at_local_backend() {
        let config = AppConfig::default();
        assert_eq!(config.backend_url, DEFAULT_BACKEND_URL);
        assert_eq!(config.backend_timeout(), Duration::from_secs(10));
        assert!(!config.is_configured());
    }

    #[test]
    fn explicit_backend_counts_as_configured() {
        let config = AppConfig::default().with_backend_url("http://127.0.0.1:9000");
        assert!(config.is_configured());
    }
}
