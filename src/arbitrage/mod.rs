//! Arbitrage module for valuing bonus/hedge pairings.
//!
//! This module handles:
//! - Hedge stake sizing and guaranteed-profit calculation
//! - Scanning an odds snapshot for candidate pairings

pub mod calculator;
pub mod detector;

pub use calculator::{
    evaluate, round_money, ArbitrageCalculator, ArbitrageResult, StakeWarning,
    DEFAULT_MAX_HEDGE_MULTIPLE,
};
pub use detector::{find_opportunities, RejectedPairing, ScanOutcome};
