//! Odds notation conversions.
//!
//! American odds are quoted as signed integers (`+150`, `-120`), decimal odds
//! as a payout multiplier on the stake, and implied probability as the
//! break-even win rate for a price.

pub mod convert;

pub use convert::{
    decimal_to_american, decimal_to_implied_probability, overround, to_decimal,
    to_implied_probability,
};
