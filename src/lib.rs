//! Bonus-bet arbitrage valuation and opportunity aggregation.
//!
//! A sportsbook bonus is wagered at one book and hedged with real money on
//! the opposing selection at another. Stake sizing fixes the real-money
//! stake so the bettor nets a known amount whichever side wins:
//!
//! ```text
//! Bonus:  $100 on Lakers  @ +300  (decimal 4.00)
//! Hedge:  $360 on Celtics @ -120  (decimal 1.833)
//! ───────────────────────────────────────────────
//! Lakers win:  100 × 4 − 360      = +$40
//! Celtics win: 360 × 0.833 − 100  = +$200
//! Guaranteed:                       +$40 (11.11% ROI)
//! ```
//!
//! # Modules
//!
//! - [`odds`]: American/decimal/implied-probability conversion
//! - [`bet`]: Legs, quotes and bonus offers
//! - [`arbitrage`]: Pairing valuation and snapshot scanning
//! - [`summary`]: Rolling daily/weekly statistics and rankings
//! - [`report`]: Markdown presentation
//! - [`storage`]: JSON files at the CLI edge
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`metrics`]: Prometheus counters and histograms
//! - [`api`]: HTTP API
//! - [`utils`]: Utility functions

pub mod api;
pub mod arbitrage;
pub mod bet;
pub mod config;
pub mod error;
pub mod metrics;
pub mod odds;
pub mod report;
pub mod storage;
pub mod summary;
pub mod utils;

pub use config::Config;
pub use error::{ArbError, Result};
