//! Time-windowed aggregation and ranking of opportunity records.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use time::{Date, Duration, OffsetDateTime};
use tracing::{info, instrument, warn};

use super::types::{BookPairStat, DailyStat, ScanRecord, ScanSummary, WeeklySummary};
use crate::arbitrage::ArbitrageResult;
use crate::config::Config;
use crate::metrics;

/// Default trailing window in days.
pub const DEFAULT_WINDOW_DAYS: u32 = 7;

/// Default size of the top-opportunities list.
pub const DEFAULT_TOP_N: usize = 5;

/// Builds rolling summaries from opportunity records.
///
/// Every call recomputes from the records it is handed; no state is kept
/// between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpportunityAggregator {
    top_n: usize,
}

impl Default for OpportunityAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_N)
    }
}

impl OpportunityAggregator {
    /// Create an aggregator keeping the `top_n` best opportunities.
    pub fn new(top_n: usize) -> Self {
        Self { top_n }
    }

    /// Create an aggregator from config.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.top_n)
    }

    /// Size of the top-opportunities list.
    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// Summarize the records discovered within `[as_of - window_days, as_of]`.
    #[instrument(skip(self, records), fields(records = records.len(), as_of = %as_of))]
    pub fn aggregate(
        &self,
        records: &[ScanRecord],
        as_of: OffsetDateTime,
        window_days: u32,
    ) -> WeeklySummary {
        metrics::inc_aggregations();
        // a window reaching past the earliest representable date is unbounded below
        let window_start = as_of
            .checked_sub(Duration::days(i64::from(window_days)))
            .unwrap_or_else(|| Date::MIN.midnight().assume_utc());

        let mut skipped_count = 0u64;
        let mut excluded_count = 0u64;
        let mut in_window = Vec::with_capacity(records.len());

        for (index, record) in records.iter().enumerate() {
            match record.clone().into_result() {
                Ok(result) => {
                    if result.discovered_at < window_start || result.discovered_at > as_of {
                        metrics::inc_records_excluded();
                        excluded_count += 1;
                    } else {
                        in_window.push(result);
                    }
                }
                Err(e) => {
                    warn!(index, error = %e, "Skipping malformed record");
                    metrics::inc_records_skipped();
                    skipped_count += 1;
                }
            }
        }

        let summary = self.summarize_window(&in_window, as_of, window_days, skipped_count);

        info!(
            total = summary.total_count,
            profitable = summary.profitable_count,
            excluded = excluded_count,
            skipped = skipped_count,
            total_profit = %summary.total_profit,
            "Aggregation complete"
        );

        summary
    }

    /// Summarize already-validated results.
    pub fn aggregate_results(
        &self,
        results: &[ArbitrageResult],
        as_of: OffsetDateTime,
        window_days: u32,
    ) -> WeeklySummary {
        let records: Vec<ScanRecord> = results.iter().cloned().map(ScanRecord::from).collect();
        self.aggregate(&records, as_of, window_days)
    }

    fn summarize_window(
        &self,
        results: &[ArbitrageResult],
        as_of: OffsetDateTime,
        window_days: u32,
        skipped_count: u64,
    ) -> WeeklySummary {
        let mut days: BTreeMap<time::Date, DailyStat> = BTreeMap::new();
        let mut pairs: BTreeMap<(&str, &str), BookPairStat> = BTreeMap::new();
        let mut total_profit = Decimal::ZERO;
        let mut total_risk = Decimal::ZERO;
        let mut profitable: Vec<&ArbitrageResult> = Vec::new();

        for result in results {
            let date = result.discovered_at.to_offset(time::UtcOffset::UTC).date();
            days.entry(date)
                .or_insert_with(|| DailyStat::new(date))
                .record(result);

            total_risk += result.hedge_stake;

            if result.is_profitable() {
                total_profit += result.guaranteed_profit;
                profitable.push(result);

                let pair = pairs
                    .entry((result.bonus_book(), result.hedge_book()))
                    .or_insert_with(|| BookPairStat {
                        bonus_book: result.bonus_book().to_string(),
                        hedge_book: result.hedge_book().to_string(),
                        count: 0,
                        total_profit: Decimal::ZERO,
                    });
                pair.count += 1;
                pair.total_profit += result.guaranteed_profit;
            }
        }

        let total_count = results.len() as u64;
        let profitable_count = profitable.len() as u64;

        profitable.sort_by(|a, b| {
            b.guaranteed_profit
                .cmp(&a.guaranteed_profit)
                .then_with(|| a.discovered_at.cmp(&b.discovered_at))
        });
        let top_opportunities = profitable
            .into_iter()
            .take(self.top_n)
            .cloned()
            .collect();

        let mut book_pair_stats: Vec<BookPairStat> = pairs.into_values().collect();
        book_pair_stats.sort_by(|a, b| b.total_profit.cmp(&a.total_profit));

        WeeklySummary {
            as_of,
            window_days,
            daily_stats: days.into_values().rev().collect(),
            top_opportunities,
            book_pair_stats,
            total_count,
            profitable_count,
            total_profit,
            total_risk,
            success_rate: success_rate(profitable_count, total_count),
            skipped_count,
        }
    }
}

/// Profitable share as a percentage rounded to 2 places, 0 when empty.
pub fn success_rate(profitable_count: u64, total_count: u64) -> Decimal {
    if total_count == 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(profitable_count) / Decimal::from(total_count) * Decimal::ONE_HUNDRED)
        .round_dp(2)
}

/// Summarize with the default top-N.
pub fn aggregate(records: &[ScanRecord], as_of: OffsetDateTime, window_days: u32) -> WeeklySummary {
    OpportunityAggregator::default().aggregate(records, as_of, window_days)
}

/// Totals for one scan run.
pub fn summarize_scan(results: &[ArbitrageResult]) -> ScanSummary {
    let profitable: Vec<&ArbitrageResult> = results.iter().filter(|r| r.is_profitable()).collect();

    let total_guaranteed_profit = profitable.iter().map(|r| r.guaranteed_profit).sum();
    let average_roi_pct = if profitable.is_empty() {
        Decimal::ZERO
    } else {
        let roi_sum: Decimal = profitable.iter().map(|r| r.roi_pct).sum();
        (roi_sum / Decimal::from(profitable.len() as u64)).round_dp(2)
    };

    ScanSummary {
        total: results.len() as u64,
        profitable: profitable.len() as u64,
        total_guaranteed_profit,
        average_roi_pct,
    }
}
