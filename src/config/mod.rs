//! Configuration module - environment variable parsing

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::game::{ArenaLayout, OrchestratorConfig, RoundTiming};

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Server binding address
    pub server_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Allowed client origin for CORS (comma-separated, or `*`)
    pub client_origin: String,

    /// Arena width in pixels
    pub arena_width: f32,
    /// Arena height in pixels
    pub arena_height: f32,
    /// Animation frames per second
    pub frame_rate: u32,
    /// Snapshots published to clients per second
    pub snapshot_rate: u32,

    /// Shortest wait before a volley (ms)
    pub round_min_delay_ms: u64,
    /// Random window added to the minimum wait (ms)
    pub round_delay_span_ms: u64,
    /// Delay between a volley and its resolution (ms)
    pub resolve_delay_ms: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Hosting platforms provide PORT, fall back to SERVER_ADDR or default
        let server_addr = if let Some(port) = lookup("PORT") {
            format!("0.0.0.0:{}", port)
        } else {
            lookup("SERVER_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string())
        };

        let frame_rate: u32 = parse_or(&lookup, "FRAME_RATE", 60)?;
        let snapshot_rate: u32 = parse_or(&lookup, "SNAPSHOT_RATE", 20)?;
        if frame_rate == 0 {
            return Err(ConfigError::Invalid("FRAME_RATE"));
        }
        if snapshot_rate == 0 {
            return Err(ConfigError::Invalid("SNAPSHOT_RATE"));
        }

        Ok(Self {
            server_addr: server_addr
                .parse()
                .map_err(|_| ConfigError::InvalidAddress)?,

            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            client_origin: lookup("CLIENT_ORIGIN").unwrap_or_else(|| "*".to_string()),

            arena_width: parse_or(&lookup, "ARENA_WIDTH", 800.0)?,
            arena_height: parse_or(&lookup, "ARENA_HEIGHT", 600.0)?,
            frame_rate,
            snapshot_rate,

            round_min_delay_ms: parse_or(&lookup, "ROUND_MIN_DELAY_MS", 3000)?,
            round_delay_span_ms: parse_or(&lookup, "ROUND_DELAY_SPAN_MS", 2000)?,
            resolve_delay_ms: parse_or(&lookup, "RESOLVE_DELAY_MS", 500)?,
        })
    }

    /// Duel settings derived from this configuration
    pub fn orchestrator(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            layout: ArenaLayout::new(self.arena_width, self.arena_height),
            timing: RoundTiming {
                min_delay: Duration::from_millis(self.round_min_delay_ms),
                delay_span: Duration::from_millis(self.round_delay_span_ms),
                resolve_delay: Duration::from_millis(self.resolve_delay_ms),
            },
            frame_rate: self.frame_rate,
            snapshot_rate: self.snapshot_rate,
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),

    #[error("Invalid server address format")]
    InvalidAddress,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_match_classic_duel() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.server_addr.port(), 8080);
        assert_eq!(config.log_level, "info");

        let duel = config.orchestrator();
        assert_eq!(duel.layout, ArenaLayout::default());
        assert_eq!(duel.timing, RoundTiming::default());
        assert_eq!(duel.frame_rate, 60);
        assert_eq!(duel.snapshot_rate, 20);
    }

    #[test]
    fn port_overrides_server_addr() {
        let config = config_from(&[("PORT", "9000"), ("SERVER_ADDR", "127.0.0.1:1")]).unwrap();
        assert_eq!(config.server_addr.port(), 9000);
    }

    #[test]
    fn rejects_bad_numbers() {
        assert!(matches!(
            config_from(&[("RESOLVE_DELAY_MS", "soon")]),
            Err(ConfigError::Invalid("RESOLVE_DELAY_MS"))
        ));
        assert!(matches!(
            config_from(&[("FRAME_RATE", "0")]),
            Err(ConfigError::Invalid("FRAME_RATE"))
        ));
        assert!(matches!(
            config_from(&[("SERVER_ADDR", "nowhere")]),
            Err(ConfigError::InvalidAddress)
        ));
    }

    #[test]
    fn timing_overrides_flow_through() {
        let config = config_from(&[
            ("ROUND_MIN_DELAY_MS", "100"),
            ("ROUND_DELAY_SPAN_MS", "50"),
            ("RESOLVE_DELAY_MS", "10"),
        ])
        .unwrap();
        let timing = config.orchestrator().timing;
        assert_eq!(timing.min_delay, Duration::from_millis(100));
        assert_eq!(timing.delay_span, Duration::from_millis(50));
        assert_eq!(timing.resolve_delay, Duration::from_millis(10));
    }
}
