//! Leg types for a bonus/hedge pairing.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::OddsError;
use crate::odds;

/// Which side of a paired wager settles as the winner.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The selection backed with bonus credit wins.
    #[strum(serialize = "bonus_wins", serialize = "bonus")]
    BonusWins,
    /// The selection backed with real money wins.
    #[strum(serialize = "hedge_wins", serialize = "hedge")]
    HedgeWins,
}

impl Outcome {
    /// Get the opposite outcome.
    pub fn opposite(&self) -> Self {
        match self {
            Outcome::BonusWins => Outcome::HedgeWins,
            Outcome::HedgeWins => Outcome::BonusWins,
        }
    }
}

/// One side of a bet at a sportsbook.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Leg {
    /// Sportsbook offering the price.
    pub sportsbook: String,
    /// Team or participant backed.
    pub selection: String,
    /// Quoted American odds (nonzero).
    pub american_odds: i32,
}

impl Leg {
    /// Create a new leg.
    pub fn new(
        sportsbook: impl Into<String>,
        selection: impl Into<String>,
        american_odds: i32,
    ) -> Self {
        Self {
            sportsbook: sportsbook.into(),
            selection: selection.into(),
            american_odds,
        }
    }

    /// Decimal odds of this leg.
    pub fn decimal_odds(&self) -> Result<Decimal, OddsError> {
        odds::to_decimal(self.american_odds)
    }

    /// Implied probability of this leg.
    pub fn implied_probability(&self) -> Result<Decimal, OddsError> {
        odds::to_implied_probability(self.american_odds)
    }
}

/// Leg wagered with non-withdrawable bonus credit.
///
/// The bonus amount is the stake; it is never chosen separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusLeg {
    /// The quoted side.
    #[serde(flatten)]
    pub leg: Leg,
    /// Bonus credit wagered.
    pub bonus_amount: Decimal,
}

impl BonusLeg {
    /// Create a new bonus leg.
    pub fn new(
        sportsbook: impl Into<String>,
        selection: impl Into<String>,
        american_odds: i32,
        bonus_amount: Decimal,
    ) -> Self {
        Self {
            leg: Leg::new(sportsbook, selection, american_odds),
            bonus_amount,
        }
    }

    /// Sportsbook holding the bonus.
    pub fn sportsbook(&self) -> &str {
        &self.leg.sportsbook
    }
}

/// Leg wagered with the bettor's own money; its stake is derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HedgeLeg {
    /// The quoted side.
    #[serde(flatten)]
    pub leg: Leg,
}

impl HedgeLeg {
    /// Create a new hedge leg.
    pub fn new(
        sportsbook: impl Into<String>,
        selection: impl Into<String>,
        american_odds: i32,
    ) -> Self {
        Self {
            leg: Leg::new(sportsbook, selection, american_odds),
        }
    }

    /// Sportsbook taking the hedge.
    pub fn sportsbook(&self) -> &str {
        &self.leg.sportsbook
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn outcome_opposite_works() {
        assert_eq!(Outcome::BonusWins.opposite(), Outcome::HedgeWins);
        assert_eq!(Outcome::HedgeWins.opposite(), Outcome::BonusWins);
    }

    #[test]
    fn outcome_from_string_works() {
        use std::str::FromStr;
        assert_eq!(Outcome::from_str("bonus").unwrap(), Outcome::BonusWins);
        assert_eq!(Outcome::from_str("hedge_wins").unwrap(), Outcome::HedgeWins);
        assert_eq!(Outcome::HedgeWins.to_string(), "hedge_wins");
    }

    #[test]
    fn leg_prices() {
        let leg = Leg::new("FanDuel", "Boston Celtics", 110);
        assert_eq!(leg.decimal_odds().unwrap(), dec!(2.10));
        assert!(Leg::new("FanDuel", "Boston Celtics", 0).decimal_odds().is_err());
    }

    #[test]
    fn bonus_leg_serializes_flat() {
        let leg = BonusLeg::new("DraftKings", "Los Angeles Lakers", -120, dec!(1000));
        let json = serde_json::to_value(&leg).unwrap();

        assert_eq!(json["sportsbook"], "DraftKings");
        assert_eq!(json["american_odds"], -120);

        let back: BonusLeg = serde_json::from_value(json).unwrap();
        assert_eq!(back, leg);
    }

    #[test]
    fn bonus_leg_accepts_numeric_amount() {
        let json = r#"{"sportsbook":"DraftKings","selection":"Lakers","american_odds":-120,"bonus_amount":250}"#;
        let leg: BonusLeg = serde_json::from_str(json).unwrap();
        assert_eq!(leg.bonus_amount, dec!(250));
        assert_eq!(leg.sportsbook(), "DraftKings");
    }
}
