//! Unified error types for bonus-bet arbitrage evaluation.

use rust_decimal::Decimal;
use thiserror::Error;

/// Unified error type for the crate.
#[derive(Error, Debug)]
pub enum ArbError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration validation error.
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// Odds conversion or stake calculation error.
    #[error("odds error: {0}")]
    Odds(#[from] OddsError),

    /// Malformed input record.
    #[error("record error: {0}")]
    Record(#[from] RecordError),

    /// JSON parsing error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Odds conversion and stake sizing errors.
///
/// Raised synchronously by the calculator and never recovered internally;
/// callers skip or log the offending pairing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OddsError {
    /// American odds of zero have no meaning.
    #[error("invalid american odds: {odds}")]
    InvalidOdds {
        /// Offending American odds.
        odds: i32,
    },

    /// Decimal price that returns no more than the stake.
    #[error("non-hedgeable price: decimal {decimal} must be > 1 (american odds {odds:?})")]
    NonHedgeable {
        /// Offending American odds, if the price came from one.
        odds: Option<i32>,
        /// Decimal odds derived from it.
        decimal: Decimal,
    },

    /// Bonus credit below zero.
    #[error("invalid bonus amount: {amount}")]
    NegativeBonus {
        /// Offending amount.
        amount: Decimal,
    },

    /// Stake sizing exceeded decimal range.
    #[error("hedge stake overflow for bonus {bonus_amount} against odds {hedge_odds}")]
    StakeOverflow {
        /// Bonus amount being hedged.
        bonus_amount: Decimal,
        /// Hedge American odds.
        hedge_odds: i32,
    },
}

/// Malformed aggregation or acquisition record.
///
/// Non-fatal: the aggregator absorbs these and counts them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// A required field is absent.
    #[error("missing field: {field}")]
    MissingField {
        /// Field name.
        field: &'static str,
    },

    /// A field is present but unusable.
    #[error("invalid {field}: {reason}")]
    InvalidValue {
        /// Field name.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

/// Configuration validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ConfigError(pub String);

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, ArbError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn odds_errors_carry_offending_value() {
        let err = OddsError::InvalidOdds { odds: 0 };
        assert_eq!(err.to_string(), "invalid american odds: 0");

        let err = OddsError::NonHedgeable {
            odds: None,
            decimal: dec!(1.0),
        };
        assert!(err.to_string().contains("decimal 1.0"));
    }

    #[test]
    fn record_error_converts_into_arb_error() {
        let err: ArbError = RecordError::MissingField {
            field: "guaranteed_profit",
        }
        .into();
        assert!(matches!(err, ArbError::Record(_)));
        assert_eq!(err.to_string(), "record error: missing field: guaranteed_profit");
    }
}
