//! Bet legs and the odds quotes they are built from.
//!
//! This module handles:
//! - Leg types for the bonus-funded and real-money sides of a pairing
//! - Normalized odds quotes and bonus offers supplied by acquisition

pub mod quote;
pub mod types;

pub use quote::{BonusOffer, OddsQuote};
pub use types::{BonusLeg, HedgeLeg, Leg, Outcome};
