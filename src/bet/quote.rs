//! Normalized odds quotes and bonus offers from the acquisition layer.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{BonusLeg, HedgeLeg};
use crate::error::RecordError;

/// One quoted price for one side of an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OddsQuote {
    /// Event identifier grouping the opposing selections.
    pub event: String,
    /// Sportsbook quoting the price.
    pub sportsbook: String,
    /// Team or participant.
    pub selection: String,
    /// American odds.
    pub american_odds: i32,
}

impl OddsQuote {
    /// Check that the quote can become a leg.
    pub fn validate(&self) -> Result<(), RecordError> {
        if self.event.trim().is_empty() {
            return Err(RecordError::MissingField { field: "event" });
        }
        if self.sportsbook.trim().is_empty() {
            return Err(RecordError::MissingField { field: "sportsbook" });
        }
        if self.selection.trim().is_empty() {
            return Err(RecordError::MissingField { field: "selection" });
        }
        if self.american_odds == 0 {
            return Err(RecordError::InvalidValue {
                field: "american_odds",
                reason: "odds must be nonzero".to_string(),
            });
        }
        Ok(())
    }

    /// Back this quote with bonus credit.
    pub fn bonus_leg(&self, bonus_amount: Decimal) -> BonusLeg {
        BonusLeg::new(
            self.sportsbook.clone(),
            self.selection.clone(),
            self.american_odds,
            bonus_amount,
        )
    }

    /// Back this quote with real money.
    pub fn hedge_leg(&self) -> HedgeLeg {
        HedgeLeg::new(
            self.sportsbook.clone(),
            self.selection.clone(),
            self.american_odds,
        )
    }
}

/// Bonus credit available at a sportsbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusOffer {
    /// Sportsbook issuing the credit.
    pub sportsbook: String,
    /// Credit amount.
    pub amount: Decimal,
}

impl BonusOffer {
    /// Check that the offer is usable.
    pub fn validate(&self) -> Result<(), RecordError> {
        if self.sportsbook.trim().is_empty() {
            return Err(RecordError::MissingField { field: "sportsbook" });
        }
        if self.amount.is_sign_negative() {
            return Err(RecordError::InvalidValue {
                field: "amount",
                reason: format!("bonus amount {} is negative", self.amount),
            });
        }
        Ok(())
    }
}
