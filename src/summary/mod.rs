//! Rolling summaries over stored opportunity records.
//!
//! This module handles:
//! - Validating stored records, counting malformed ones
//! - Daily statistics, top-N ranking and book-pair breakdown over a window
//! - Totals for a single scan run

pub mod aggregator;
pub mod types;

pub use aggregator::{
    aggregate, success_rate, summarize_scan, OpportunityAggregator, DEFAULT_TOP_N,
    DEFAULT_WINDOW_DAYS,
};
pub use types::{BookPairStat, DailyStat, ScanRecord, ScanSummary, WeeklySummary};
