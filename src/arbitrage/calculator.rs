//! Stake sizing and guaranteed-profit calculation for a bonus/hedge pairing.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{debug, instrument, warn};

use crate::bet::{BonusLeg, HedgeLeg, Outcome};
use crate::config::Config;
use crate::error::OddsError;
use crate::metrics;

/// Hedge stake / bonus amount ratio above which a result is flagged.
pub const DEFAULT_MAX_HEDGE_MULTIPLE: Decimal = dec!(25);

/// Condition attached to a result whose numbers should not be trusted blindly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StakeWarning {
    /// Hedge price so short that the required stake dwarfs the bonus.
    UnboundedHedge {
        /// Required hedge stake (rounded).
        hedge_stake: Decimal,
        /// Hedge stake as a multiple of the bonus amount (rounded).
        multiple: Decimal,
    },
}

/// Evaluated bonus/hedge pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArbitrageResult {
    /// Bonus-funded leg as supplied.
    pub bonus_leg: BonusLeg,
    /// Real-money leg as supplied.
    pub hedge_leg: HedgeLeg,
    /// Real money committed to the hedge.
    pub hedge_stake: Decimal,
    /// Net result when the bonus side wins.
    pub profit_if_bonus_wins: Decimal,
    /// Net result when the hedge side wins.
    pub profit_if_hedge_wins: Decimal,
    /// Worst case across both outcomes.
    pub guaranteed_profit: Decimal,
    /// Guaranteed profit as a percentage of the hedge stake.
    pub roi_pct: Decimal,
    /// When the pairing was evaluated.
    #[serde(with = "time::serde::rfc3339")]
    pub discovered_at: OffsetDateTime,
    /// Stake conditions flagged during evaluation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<StakeWarning>,
}

impl ArbitrageResult {
    /// Whether the pairing profits on every outcome.
    pub fn is_profitable(&self) -> bool {
        self.guaranteed_profit > Decimal::ZERO
    }

    /// Net result for a given outcome.
    pub fn profit_if(&self, outcome: Outcome) -> Decimal {
        match outcome {
            Outcome::BonusWins => self.profit_if_bonus_wins,
            Outcome::HedgeWins => self.profit_if_hedge_wins,
        }
    }

    /// Outcome that produces the guaranteed (worst-case) profit.
    pub fn worst_outcome(&self) -> Outcome {
        if self.profit_if_hedge_wins < self.profit_if_bonus_wins {
            Outcome::HedgeWins
        } else {
            Outcome::BonusWins
        }
    }

    /// Real money at risk (the hedge stake).
    pub fn real_money_risk(&self) -> Decimal {
        self.hedge_stake
    }

    /// Sportsbook holding the bonus.
    pub fn bonus_book(&self) -> &str {
        self.bonus_leg.sportsbook()
    }

    /// Sportsbook taking the hedge.
    pub fn hedge_book(&self) -> &str {
        self.hedge_leg.sportsbook()
    }

    /// Whether any stake warning was attached.
    pub fn is_flagged(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Full-precision outcome of the two-outcome model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scenarios {
    /// Stake-equalizing hedge size.
    pub hedge_stake: Decimal,
    /// Bonus payout minus the lost hedge.
    pub profit_if_bonus_wins: Decimal,
    /// Hedge winnings minus the forfeited bonus credit.
    pub profit_if_hedge_wins: Decimal,
}

impl Scenarios {
    /// Worst case of the two outcomes.
    pub fn guaranteed_profit(&self) -> Decimal {
        self.profit_if_bonus_wins.min(self.profit_if_hedge_wins)
    }
}

/// Hedge stake that equalizes exposure: `bonus × (bonus_dec − 1) / (hedge_dec − 1)`.
pub fn hedge_stake_for(
    bonus_amount: Decimal,
    bonus_decimal: Decimal,
    hedge_decimal: Decimal,
) -> Result<Decimal, OddsError> {
    if hedge_decimal <= Decimal::ONE {
        return Err(OddsError::NonHedgeable {
            odds: None,
            decimal: hedge_decimal,
        });
    }

    bonus_amount
        .checked_mul(bonus_decimal - Decimal::ONE)
        .and_then(|net| net.checked_div(hedge_decimal - Decimal::ONE))
        .ok_or(OddsError::StakeOverflow {
            bonus_amount,
            hedge_odds: 0,
        })
}

/// Compute both outcomes at full precision.
///
/// When the bonus side wins the whole payout `bonus × bonus_dec` counts as
/// profit, because the credit was never withdrawable, and the hedge stake is
/// lost. When the hedge side wins the hedge returns its net winnings and the
/// bonus amount is charged as forfeited credit.
pub fn scenarios(
    bonus_amount: Decimal,
    bonus_decimal: Decimal,
    hedge_decimal: Decimal,
) -> Result<Scenarios, OddsError> {
    let hedge_stake = hedge_stake_for(bonus_amount, bonus_decimal, hedge_decimal)?;
    let overflow = || OddsError::StakeOverflow {
        bonus_amount,
        hedge_odds: 0,
    };

    let bonus_payout = bonus_amount.checked_mul(bonus_decimal).ok_or_else(overflow)?;
    let hedge_winnings = hedge_stake
        .checked_mul(hedge_decimal - Decimal::ONE)
        .ok_or_else(overflow)?;

    Ok(Scenarios {
        hedge_stake,
        profit_if_bonus_wins: bonus_payout - hedge_stake,
        profit_if_hedge_wins: hedge_winnings - bonus_amount,
    })
}

/// Round a monetary value at the result boundary.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp(2)
}

/// Evaluates bonus/hedge pairings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArbitrageCalculator {
    max_hedge_multiple: Decimal,
}

impl Default for ArbitrageCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HEDGE_MULTIPLE)
    }
}

impl ArbitrageCalculator {
    /// Create a calculator flagging hedges above `max_hedge_multiple` × bonus.
    pub fn new(max_hedge_multiple: Decimal) -> Self {
        Self { max_hedge_multiple }
    }

    /// Create a calculator from config.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.max_hedge_multiple)
    }

    /// Configured stake guard multiple.
    pub fn max_hedge_multiple(&self) -> Decimal {
        self.max_hedge_multiple
    }

    /// Evaluate one bonus leg against one hedge leg.
    #[instrument(
        skip(self, bonus_leg, hedge_leg, discovered_at),
        fields(bonus_book = %bonus_leg.sportsbook(), hedge_book = %hedge_leg.sportsbook())
    )]
    pub fn evaluate(
        &self,
        bonus_leg: BonusLeg,
        hedge_leg: HedgeLeg,
        discovered_at: OffsetDateTime,
    ) -> Result<ArbitrageResult, OddsError> {
        let _timer = metrics::timer_evaluation();
        metrics::inc_evaluations();

        let result = self.evaluate_inner(bonus_leg, hedge_leg, discovered_at);

        match &result {
            Ok(r) => {
                if r.is_profitable() {
                    metrics::inc_profitable();
                }
                if r.is_flagged() {
                    metrics::inc_stake_warnings();
                }
            }
            Err(_) => metrics::inc_invalid_odds(),
        }

        result
    }

    fn evaluate_inner(
        &self,
        bonus_leg: BonusLeg,
        hedge_leg: HedgeLeg,
        discovered_at: OffsetDateTime,
    ) -> Result<ArbitrageResult, OddsError> {
        let bonus_amount = bonus_leg.bonus_amount;
        if bonus_amount.is_sign_negative() && !bonus_amount.is_zero() {
            return Err(OddsError::NegativeBonus {
                amount: bonus_amount,
            });
        }

        let bonus_decimal = bonus_leg.leg.decimal_odds()?;
        let hedge_odds = hedge_leg.leg.american_odds;
        let hedge_decimal = hedge_leg.leg.decimal_odds()?;

        let outcome = scenarios(bonus_amount, bonus_decimal, hedge_decimal).map_err(|e| match e {
            OddsError::NonHedgeable { decimal, .. } => OddsError::NonHedgeable {
                odds: Some(hedge_odds),
                decimal,
            },
            OddsError::StakeOverflow { bonus_amount, .. } => OddsError::StakeOverflow {
                bonus_amount,
                hedge_odds,
            },
            other => other,
        })?;

        let guaranteed_profit = outcome.guaranteed_profit();
        let roi_pct = if outcome.hedge_stake > Decimal::ZERO {
            guaranteed_profit / outcome.hedge_stake * Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        };

        debug!(
            bonus_odds = bonus_leg.leg.american_odds,
            hedge_odds,
            bonus_decimal = %bonus_decimal,
            hedge_decimal = %hedge_decimal,
            hedge_stake = %outcome.hedge_stake,
            guaranteed_profit = %guaranteed_profit,
            "Pairing evaluated"
        );

        let mut warnings = Vec::new();
        if bonus_amount > Decimal::ZERO {
            let multiple = outcome.hedge_stake / bonus_amount;
            if multiple > self.max_hedge_multiple {
                warn!(
                    hedge_stake = %round_money(outcome.hedge_stake),
                    multiple = %multiple.round_dp(2),
                    limit = %self.max_hedge_multiple,
                    "Hedge stake unbounded relative to bonus"
                );
                warnings.push(StakeWarning::UnboundedHedge {
                    hedge_stake: round_money(outcome.hedge_stake),
                    multiple: multiple.round_dp(2),
                });
            }
        }

        Ok(ArbitrageResult {
            bonus_leg,
            hedge_leg,
            hedge_stake: round_money(outcome.hedge_stake),
            profit_if_bonus_wins: round_money(outcome.profit_if_bonus_wins),
            profit_if_hedge_wins: round_money(outcome.profit_if_hedge_wins),
            guaranteed_profit: round_money(guaranteed_profit),
            roi_pct: roi_pct.round_dp(2),
            discovered_at,
            warnings,
        })
    }
}

/// Evaluate a pairing with the default stake guard.
pub fn evaluate(
    bonus_leg: BonusLeg,
    hedge_leg: HedgeLeg,
    discovered_at: OffsetDateTime,
) -> Result<ArbitrageResult, OddsError> {
    ArbitrageCalculator::default().evaluate(bonus_leg, hedge_leg, discovered_at)
}
