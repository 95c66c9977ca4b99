//! Prometheus metrics for evaluation and aggregation.
//!
//! Calls are no-ops until a recorder is installed (the `serve` command
//! installs the Prometheus exporter).

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use tracing::debug;

// === Metric Name Constants ===

/// Evaluation latency metric name.
pub const METRIC_EVALUATION_LATENCY: &str = "evaluation_latency_ms";
/// Evaluations counter metric name.
pub const METRIC_EVALUATIONS: &str = "evaluations_total";
/// Invalid odds counter metric name.
pub const METRIC_INVALID_ODDS: &str = "invalid_odds_total";
/// Profitable opportunities counter metric name.
pub const METRIC_PROFITABLE: &str = "profitable_opportunities_total";
/// Stake warnings counter metric name.
pub const METRIC_STAKE_WARNINGS: &str = "stake_warnings_total";
/// Skipped records counter metric name.
pub const METRIC_RECORDS_SKIPPED: &str = "records_skipped_total";
/// Out-of-window records counter metric name.
pub const METRIC_RECORDS_EXCLUDED: &str = "records_excluded_total";
/// Aggregation runs counter metric name.
pub const METRIC_AGGREGATIONS: &str = "aggregations_total";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_EVALUATION_LATENCY,
        "Time to evaluate one bonus/hedge pairing in milliseconds"
    );

    describe_counter!(METRIC_EVALUATIONS, "Total number of pairings evaluated");
    describe_counter!(
        METRIC_INVALID_ODDS,
        "Total number of pairings rejected for invalid odds"
    );
    describe_counter!(
        METRIC_PROFITABLE,
        "Total number of pairings with positive guaranteed profit"
    );
    describe_counter!(
        METRIC_STAKE_WARNINGS,
        "Total number of results flagged with an unbounded hedge stake"
    );
    describe_counter!(
        METRIC_RECORDS_SKIPPED,
        "Total number of malformed records skipped during aggregation"
    );
    describe_counter!(
        METRIC_RECORDS_EXCLUDED,
        "Total number of records outside the aggregation window"
    );
    describe_counter!(METRIC_AGGREGATIONS, "Total number of aggregation runs");

    debug!("Metrics initialized");
}

/// Increment evaluations counter.
pub fn inc_evaluations() {
    counter!(METRIC_EVALUATIONS).increment(1);
}

/// Increment invalid odds counter.
pub fn inc_invalid_odds() {
    counter!(METRIC_INVALID_ODDS).increment(1);
}

/// Increment profitable opportunities counter.
pub fn inc_profitable() {
    counter!(METRIC_PROFITABLE).increment(1);
}

/// Increment stake warnings counter.
pub fn inc_stake_warnings() {
    counter!(METRIC_STAKE_WARNINGS).increment(1);
}

/// Increment skipped records counter.
pub fn inc_records_skipped() {
    counter!(METRIC_RECORDS_SKIPPED).increment(1);
}

/// Increment out-of-window records counter.
pub fn inc_records_excluded() {
    counter!(METRIC_RECORDS_EXCLUDED).increment(1);
}

/// Increment aggregation runs counter.
pub fn inc_aggregations() {
    counter!(METRIC_AGGREGATIONS).increment(1);
}

/// RAII guard for timing operations.
/// Automatically records latency when dropped.
pub struct LatencyTimer {
    start: Instant,
    metric_name: &'static str,
}

impl LatencyTimer {
    /// Create a new latency timer for the given metric.
    pub fn new(metric_name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            metric_name,
        }
    }

    /// Get elapsed time in milliseconds (without recording).
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        histogram!(self.metric_name).record(self.elapsed_ms());
    }
}

/// Create a latency timer for pairing evaluation.
pub fn timer_evaluation() -> LatencyTimer {
    LatencyTimer::new(METRIC_EVALUATION_LATENCY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn latency_timer_measures_time() {
        let timer = timer_evaluation();
        sleep(Duration::from_millis(10));
        assert!(timer.elapsed_ms() >= 9.0);
    }

    #[test]
    fn counters_without_recorder_are_noops() {
        inc_evaluations();
        inc_records_skipped();
        inc_records_excluded();
        inc_aggregations();
    }
}
