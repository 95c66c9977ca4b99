//! Application configuration loaded from environment variables.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::ConfigError;

const VERBOSE_DIRECTIVE: &str = "bonus_arb=debug,info";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Aggregation ===
    /// Trailing window for weekly summaries, in days.
    #[serde(default = "default_window_days")]
    pub window_days: u32,

    /// Number of opportunities kept in rankings.
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    // === Valuation ===
    /// Hedge stake / bonus amount above which a result is flagged.
    #[serde(default = "default_max_hedge_multiple")]
    pub max_hedge_multiple: Decimal,

    /// Guaranteed profit a result must exceed to be listed as actionable.
    #[serde(default)]
    pub min_guaranteed_profit: Decimal,

    // === Server Configuration ===
    /// HTTP server port for the API.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log filter directive (trace, debug, info, warn, error or per-target).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Enable debug logging for this crate, overriding `rust_log`.
    #[serde(default)]
    pub verbose: bool,
}

fn default_window_days() -> u32 {
    7
}

fn default_top_n() -> usize {
    5
}

fn default_max_hedge_multiple() -> Decimal {
    Decimal::new(25, 0) // 25x the bonus
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
            top_n: default_top_n(),
            max_hedge_multiple: default_max_hedge_multiple(),
            min_guaranteed_profit: Decimal::ZERO,
            port: default_port(),
            rust_log: default_log_level(),
            verbose: false,
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Tracing filter directive; verbose from either the CLI or the
    /// environment wins over `rust_log`.
    pub fn log_directive(&self, cli_verbose: bool) -> String {
        if cli_verbose || self.verbose {
            VERBOSE_DIRECTIVE.to_string()
        } else {
            self.rust_log.clone()
        }
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_days < 1 {
            return Err(ConfigError("WINDOW_DAYS must be at least 1".to_string()));
        }

        if self.top_n == 0 {
            return Err(ConfigError("TOP_N must be at least 1".to_string()));
        }

        if self.max_hedge_multiple <= Decimal::ZERO {
            return Err(ConfigError(
                "MAX_HEDGE_MULTIPLE must be greater than 0".to_string(),
            ));
        }

        if self.min_guaranteed_profit < Decimal::ZERO {
            return Err(ConfigError(
                "MIN_GUARANTEED_PROFIT must not be negative".to_string(),
            ));
        }

        Ok(())
    }
}
