//! Aggregation input records and summary types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::arbitrage::{ArbitrageResult, StakeWarning};
use crate::bet::{BonusLeg, HedgeLeg};
use crate::error::RecordError;

/// Stored opportunity record as read back from a scan run.
///
/// Every field is optional so a partial record still deserializes and can
/// be counted as malformed instead of failing the whole batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRecord {
    /// Bonus-funded leg.
    #[serde(default)]
    pub bonus_leg: Option<BonusLeg>,
    /// Real-money leg.
    #[serde(default)]
    pub hedge_leg: Option<HedgeLeg>,
    /// Real money committed.
    #[serde(default)]
    pub hedge_stake: Option<Decimal>,
    /// Net result when the bonus side wins.
    #[serde(default)]
    pub profit_if_bonus_wins: Option<Decimal>,
    /// Net result when the hedge side wins.
    #[serde(default)]
    pub profit_if_hedge_wins: Option<Decimal>,
    /// Worst case across both outcomes.
    #[serde(default)]
    pub guaranteed_profit: Option<Decimal>,
    /// Guaranteed profit over hedge stake, percent.
    #[serde(default)]
    pub roi_pct: Option<Decimal>,
    /// Discovery time.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub discovered_at: Option<OffsetDateTime>,
    /// Stake warnings attached at evaluation.
    #[serde(default)]
    pub warnings: Vec<StakeWarning>,
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T, RecordError> {
    value.ok_or(RecordError::MissingField { field })
}

impl ScanRecord {
    /// Validate into a complete result.
    pub fn into_result(self) -> Result<ArbitrageResult, RecordError> {
        let guaranteed_profit = required(self.guaranteed_profit, "guaranteed_profit")?;
        let discovered_at = required(self.discovered_at, "discovered_at")?;
        let bonus_leg = required(self.bonus_leg, "bonus_leg")?;
        let hedge_leg = required(self.hedge_leg, "hedge_leg")?;
        let hedge_stake = required(self.hedge_stake, "hedge_stake")?;
        let profit_if_bonus_wins = required(self.profit_if_bonus_wins, "profit_if_bonus_wins")?;
        let profit_if_hedge_wins = required(self.profit_if_hedge_wins, "profit_if_hedge_wins")?;
        let roi_pct = required(self.roi_pct, "roi_pct")?;

        if hedge_stake.is_sign_negative() && !hedge_stake.is_zero() {
            return Err(RecordError::InvalidValue {
                field: "hedge_stake",
                reason: format!("negative stake {hedge_stake}"),
            });
        }

        let worst = profit_if_bonus_wins.min(profit_if_hedge_wins);
        if guaranteed_profit != worst {
            return Err(RecordError::InvalidValue {
                field: "guaranteed_profit",
                reason: format!("{guaranteed_profit} is not the worst outcome {worst}"),
            });
        }

        Ok(ArbitrageResult {
            bonus_leg,
            hedge_leg,
            hedge_stake,
            profit_if_bonus_wins,
            profit_if_hedge_wins,
            guaranteed_profit,
            roi_pct,
            discovered_at,
            warnings: self.warnings,
        })
    }
}

impl From<ArbitrageResult> for ScanRecord {
    fn from(result: ArbitrageResult) -> Self {
        Self {
            bonus_leg: Some(result.bonus_leg),
            hedge_leg: Some(result.hedge_leg),
            hedge_stake: Some(result.hedge_stake),
            profit_if_bonus_wins: Some(result.profit_if_bonus_wins),
            profit_if_hedge_wins: Some(result.profit_if_hedge_wins),
            guaranteed_profit: Some(result.guaranteed_profit),
            roi_pct: Some(result.roi_pct),
            discovered_at: Some(result.discovered_at),
            warnings: result.warnings,
        }
    }
}

/// Per-day statistics keyed by UTC discovery date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStat {
    /// Calendar date.
    pub date: Date,
    /// Records discovered that day.
    pub total_count: u64,
    /// Records with positive guaranteed profit.
    pub profitable_count: u64,
    /// Sum of guaranteed profit over profitable records.
    pub total_profit: Decimal,
    /// Sum of hedge stakes over all records.
    pub total_risk: Decimal,
}

impl DailyStat {
    /// Empty stat for a date.
    pub fn new(date: Date) -> Self {
        Self {
            date,
            total_count: 0,
            profitable_count: 0,
            total_profit: Decimal::ZERO,
            total_risk: Decimal::ZERO,
        }
    }

    /// Fold one result into the day.
    pub fn record(&mut self, result: &ArbitrageResult) {
        self.total_count += 1;
        self.total_risk += result.hedge_stake;
        if result.is_profitable() {
            self.profitable_count += 1;
            self.total_profit += result.guaranteed_profit;
        }
    }
}

/// Statistics per ordered (bonus book, hedge book) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookPairStat {
    /// Book holding the bonus.
    pub bonus_book: String,
    /// Book taking the hedge.
    pub hedge_book: String,
    /// Profitable results for the pair.
    pub count: u64,
    /// Sum of their guaranteed profit.
    pub total_profit: Decimal,
}

/// Rolling summary over a trailing window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklySummary {
    /// End of the window (inclusive).
    #[serde(with = "time::serde::rfc3339")]
    pub as_of: OffsetDateTime,
    /// Window length in days.
    pub window_days: u32,
    /// Days with at least one record, newest first.
    pub daily_stats: Vec<DailyStat>,
    /// Best profitable results, highest guaranteed profit first.
    pub top_opportunities: Vec<ArbitrageResult>,
    /// Profitable results per book pair, highest total profit first.
    pub book_pair_stats: Vec<BookPairStat>,
    /// Records inside the window.
    pub total_count: u64,
    /// Profitable records inside the window.
    pub profitable_count: u64,
    /// Guaranteed profit summed over profitable records.
    pub total_profit: Decimal,
    /// Hedge stakes summed over all records.
    pub total_risk: Decimal,
    /// Profitable share of records, percent.
    pub success_rate: Decimal,
    /// Malformed records skipped.
    pub skipped_count: u64,
}

/// Totals for a single scan run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    /// Results evaluated.
    pub total: u64,
    /// Results with positive guaranteed profit.
    pub profitable: u64,
    /// Guaranteed profit summed over profitable results.
    pub total_guaranteed_profit: Decimal,
    /// Mean ROI of profitable results, percent.
    pub average_roi_pct: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arbitrage::evaluate;
    use rust_decimal_macros::dec;
    use time::macros::{date, datetime};

    fn result() -> ArbitrageResult {
        evaluate(
            BonusLeg::new("DraftKings", "Lakers", 300, dec!(100)),
            HedgeLeg::new("FanDuel", "Celtics", -120),
            datetime!(2026-02-18 07:52:47 UTC),
        )
        .unwrap()
    }

    #[test]
    fn complete_record_converts_back() {
        let original = result();
        let record = ScanRecord::from(original.clone());
        assert_eq!(record.into_result().unwrap(), original);
    }

    #[test]
    fn missing_guaranteed_profit_is_malformed() {
        let mut record = ScanRecord::from(result());
        record.guaranteed_profit = None;
        assert_eq!(
            record.into_result(),
            Err(RecordError::MissingField {
                field: "guaranteed_profit"
            })
        );
    }

    #[test]
    fn inconsistent_profit_is_malformed() {
        let mut record = ScanRecord::from(result());
        record.guaranteed_profit = Some(dec!(500));
        assert!(matches!(
            record.into_result(),
            Err(RecordError::InvalidValue { field: "guaranteed_profit", .. })
        ));
    }

    #[test]
    fn partial_json_deserializes() {
        let record: ScanRecord =
            serde_json::from_str(r#"{"guaranteed_profit": 12.5, "hedge_stake": "100"}"#).unwrap();
        assert_eq!(record.guaranteed_profit, Some(dec!(12.5)));
        assert!(record.discovered_at.is_none());
        assert!(record.into_result().is_err());
    }

    #[test]
    fn daily_stat_counts_risk_for_all_and_profit_for_profitable() {
        let profitable = result();
        let losing = evaluate(
            BonusLeg::new("DraftKings", "Lakers", -120, dec!(1000)),
            HedgeLeg::new("FanDuel", "Celtics", 110),
            datetime!(2026-02-18 09:00 UTC),
        )
        .unwrap();

        let mut day = DailyStat::new(date!(2026 - 02 - 18));
        day.record(&profitable);
        day.record(&losing);

        assert_eq!(day.total_count, 2);
        assert_eq!(day.profitable_count, 1);
        assert_eq!(day.total_profit, dec!(40));
        assert_eq!(day.total_risk, dec!(1117.58));
    }
}
