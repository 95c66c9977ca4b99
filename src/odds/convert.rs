//! Pure conversions between American odds, decimal odds and implied probability.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::error::OddsError;

/// Convert American odds to decimal odds.
///
/// `+150` pays 1.5 per unit staked plus the stake (`2.5`); `-120` needs 120
/// staked to win 100 (`1.8333...`).
pub fn to_decimal(american_odds: i32) -> Result<Decimal, OddsError> {
    let magnitude = Decimal::from(american_odds.unsigned_abs());

    match american_odds.signum() {
        1 => Ok(magnitude / Decimal::ONE_HUNDRED + Decimal::ONE),
        -1 => Ok(Decimal::ONE_HUNDRED / magnitude + Decimal::ONE),
        _ => Err(OddsError::InvalidOdds { odds: american_odds }),
    }
}

/// Convert American odds to the implied probability of the quoted side.
pub fn to_implied_probability(american_odds: i32) -> Result<Decimal, OddsError> {
    let magnitude = Decimal::from(american_odds.unsigned_abs());

    match american_odds.signum() {
        1 => Ok(Decimal::ONE_HUNDRED / (magnitude + Decimal::ONE_HUNDRED)),
        -1 => Ok(magnitude / (magnitude + Decimal::ONE_HUNDRED)),
        _ => Err(OddsError::InvalidOdds { odds: american_odds }),
    }
}

/// Implied probability of a decimal price (`1 / decimal`).
pub fn decimal_to_implied_probability(decimal: Decimal) -> Result<Decimal, OddsError> {
    if decimal <= Decimal::ONE {
        return Err(OddsError::NonHedgeable { odds: None, decimal });
    }
    Ok(Decimal::ONE / decimal)
}

/// Convert decimal odds back to the nearest American odds.
///
/// `-100` and `+100` are the same price; the inverse always yields `+100`.
pub fn decimal_to_american(decimal: Decimal) -> Result<i32, OddsError> {
    if decimal <= Decimal::ONE {
        return Err(OddsError::NonHedgeable { odds: None, decimal });
    }

    let net = decimal - Decimal::ONE;
    let american = if decimal >= Decimal::TWO {
        net * Decimal::ONE_HUNDRED
    } else {
        -(Decimal::ONE_HUNDRED / net)
    };

    american
        .round()
        .to_i32()
        .ok_or(OddsError::NonHedgeable { odds: None, decimal })
}

/// Book margin on a two-way market: sum of implied probabilities minus one.
///
/// Negative means the two prices alone already form a pure arbitrage.
pub fn overround(side_a: i32, side_b: i32) -> Result<Decimal, OddsError> {
    Ok(to_implied_probability(side_a)? + to_implied_probability(side_b)? - Decimal::ONE)
}
