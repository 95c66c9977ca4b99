//! Candidate pairing scan over a snapshot of odds quotes.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{debug, info, instrument, warn};

use super::calculator::{ArbitrageCalculator, ArbitrageResult};
use crate::bet::{BonusOffer, OddsQuote};

/// Pairing that could not be evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedPairing {
    /// Event both legs belong to.
    pub event: String,
    /// Book holding the bonus.
    pub bonus_book: String,
    /// Selection backed with bonus credit.
    pub bonus_selection: String,
    /// Book taking the hedge.
    pub hedge_book: String,
    /// Selection backed with real money.
    pub hedge_selection: String,
    /// Why evaluation failed.
    pub reason: String,
}

/// Result of scanning one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanOutcome {
    /// Evaluated pairings, best guaranteed profit first.
    pub results: Vec<ArbitrageResult>,
    /// Pairings rejected with an odds error.
    pub rejected: Vec<RejectedPairing>,
    /// Quotes dropped at validation.
    pub invalid_quotes: usize,
    /// Offers dropped at validation.
    pub invalid_offers: usize,
    /// Events skipped for not having exactly two selections.
    pub skipped_events: usize,
}

impl ScanOutcome {
    /// Results whose guaranteed profit exceeds `min_profit` (and zero).
    pub fn profitable(&self, min_profit: Decimal) -> impl Iterator<Item = &ArbitrageResult> {
        let floor = min_profit.max(Decimal::ZERO);
        self.results
            .iter()
            .filter(move |r| r.guaranteed_profit > floor)
    }
}

/// Evaluate every bonus/hedge pairing the snapshot allows.
///
/// A pairing backs one selection with an offer's bonus at the offer's book
/// and the opposing selection of the same event with real money at a
/// different book. Only two-way events are paired.
#[instrument(skip_all, fields(quotes = quotes.len(), offers = offers.len()))]
pub fn find_opportunities(
    quotes: &[OddsQuote],
    offers: &[BonusOffer],
    calculator: &ArbitrageCalculator,
    discovered_at: OffsetDateTime,
) -> ScanOutcome {
    let mut outcome = ScanOutcome::default();

    let mut events: BTreeMap<&str, Vec<&OddsQuote>> = BTreeMap::new();
    for quote in quotes {
        match quote.validate() {
            Ok(()) => events.entry(quote.event.as_str()).or_default().push(quote),
            Err(e) => {
                warn!(
                    event = %quote.event,
                    sportsbook = %quote.sportsbook,
                    error = %e,
                    "Skipping malformed quote"
                );
                outcome.invalid_quotes += 1;
            }
        }
    }

    let valid_offers: Vec<&BonusOffer> = offers
        .iter()
        .filter(|offer| match offer.validate() {
            Ok(()) => true,
            Err(e) => {
                warn!(sportsbook = %offer.sportsbook, error = %e, "Skipping malformed bonus offer");
                false
            }
        })
        .collect();
    outcome.invalid_offers = offers.len() - valid_offers.len();

    for (event, event_quotes) in &events {
        let mut selections: Vec<&str> = event_quotes.iter().map(|q| q.selection.as_str()).collect();
        selections.sort_unstable();
        selections.dedup();
        if selections.len() != 2 {
            debug!(event, selections = selections.len(), "Not a two-way event, skipping");
            outcome.skipped_events += 1;
            continue;
        }

        for offer in &valid_offers {
            for bonus_quote in event_quotes
                .iter()
                .filter(|q| q.sportsbook == offer.sportsbook)
            {
                for hedge_quote in event_quotes.iter().filter(|q| {
                    q.selection != bonus_quote.selection && q.sportsbook != offer.sportsbook
                }) {
                    let bonus_leg = bonus_quote.bonus_leg(offer.amount);
                    let hedge_leg = hedge_quote.hedge_leg();

                    match calculator.evaluate(bonus_leg, hedge_leg, discovered_at) {
                        Ok(result) => outcome.results.push(result),
                        Err(e) => {
                            warn!(
                                event,
                                bonus_book = %offer.sportsbook,
                                hedge_book = %hedge_quote.sportsbook,
                                bonus_odds = bonus_quote.american_odds,
                                hedge_odds = hedge_quote.american_odds,
                                error = %e,
                                "Skipping pairing"
                            );
                            outcome.rejected.push(RejectedPairing {
                                event: event.to_string(),
                                bonus_book: offer.sportsbook.clone(),
                                bonus_selection: bonus_quote.selection.clone(),
                                hedge_book: hedge_quote.sportsbook.clone(),
                                hedge_selection: hedge_quote.selection.clone(),
                                reason: e.to_string(),
                            });
                        }
                    }
                }
            }
        }
    }

    outcome.results.sort_by(|a, b| {
        b.guaranteed_profit
            .cmp(&a.guaranteed_profit)
            .then_with(|| a.bonus_book().cmp(b.bonus_book()))
            .then_with(|| a.hedge_book().cmp(b.hedge_book()))
            .then_with(|| a.bonus_leg.leg.selection.cmp(&b.bonus_leg.leg.selection))
    });

    info!(
        evaluated = outcome.results.len(),
        profitable = outcome.results.iter().filter(|r| r.is_profitable()).count(),
        rejected = outcome.rejected.len(),
        invalid_quotes = outcome.invalid_quotes,
        skipped_events = outcome.skipped_events,
        "Scan complete"
    );

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use time::macros::datetime;

    const NOW: OffsetDateTime = datetime!(2026-02-18 07:52:47 UTC);

    fn quote(event: &str, book: &str, selection: &str, odds: i32) -> OddsQuote {
        OddsQuote {
            event: event.to_string(),
            sportsbook: book.to_string(),
            selection: selection.to_string(),
            american_odds: odds,
        }
    }

    fn offer(book: &str, amount: Decimal) -> BonusOffer {
        BonusOffer {
            sportsbook: book.to_string(),
            amount,
        }
    }

    fn snapshot() -> Vec<OddsQuote> {
        vec![
            quote("lal-bos", "DraftKings", "Lakers", 300),
            quote("lal-bos", "DraftKings", "Celtics", -400),
            quote("lal-bos", "FanDuel", "Lakers", 280),
            quote("lal-bos", "FanDuel", "Celtics", -120),
            quote("lal-bos", "BetMGM", "Celtics", -150),
        ]
    }

    #[test]
    fn pairs_bonus_book_with_other_books_on_opposite_side() {
        let outcome = find_opportunities(
            &snapshot(),
            &[offer("DraftKings", dec!(100))],
            &ArbitrageCalculator::default(),
            NOW,
        );

        // Lakers@DK vs Celtics@FD, Celtics@MGM; Celtics@DK vs Lakers@FD
        assert_eq!(outcome.results.len(), 3);
        assert!(outcome.rejected.is_empty());
        for r in &outcome.results {
            assert_eq!(r.bonus_book(), "DraftKings");
            assert_ne!(r.hedge_book(), "DraftKings");
            assert_ne!(r.bonus_leg.leg.selection, r.hedge_leg.leg.selection);
            assert_eq!(r.discovered_at, NOW);
        }

        let best = &outcome.results[0];
        assert_eq!(best.hedge_book(), "FanDuel");
        assert_eq!(best.guaranteed_profit, dec!(40));
        assert!(outcome
            .results
            .windows(2)
            .all(|w| w[0].guaranteed_profit >= w[1].guaranteed_profit));
    }

    #[test]
    fn profitable_filter_respects_threshold() {
        let outcome = find_opportunities(
            &snapshot(),
            &[offer("DraftKings", dec!(100))],
            &ArbitrageCalculator::default(),
            NOW,
        );

        // only Lakers@DK vs Celtics@FD locks in profit (+40)
        assert_eq!(outcome.profitable(Decimal::ZERO).count(), 1);
        assert_eq!(outcome.profitable(dec!(35)).count(), 1);
        assert_eq!(outcome.profitable(dec!(40)).count(), 0);
        // negative thresholds never admit losing pairings
        assert!(outcome
            .profitable(dec!(-1000))
            .all(|r| r.guaranteed_profit > Decimal::ZERO));
    }

    #[test]
    fn malformed_quotes_and_offers_are_counted() {
        let mut quotes = snapshot();
        quotes.push(quote("lal-bos", "Caesars", "Celtics", 0));
        quotes.push(quote("", "Caesars", "Celtics", -110));

        let outcome = find_opportunities(
            &quotes,
            &[offer("DraftKings", dec!(100)), offer("FanDuel", dec!(-50))],
            &ArbitrageCalculator::default(),
            NOW,
        );

        assert_eq!(outcome.invalid_quotes, 2);
        assert_eq!(outcome.invalid_offers, 1);
        assert_eq!(outcome.results.len(), 3);
    }

    #[test]
    fn three_way_events_are_skipped() {
        let quotes = vec![
            quote("ars-che", "DraftKings", "Arsenal", 150),
            quote("ars-che", "FanDuel", "Chelsea", 200),
            quote("ars-che", "FanDuel", "Draw", 230),
        ];

        let outcome = find_opportunities(
            &quotes,
            &[offer("DraftKings", dec!(100))],
            &ArbitrageCalculator::default(),
            NOW,
        );

        assert!(outcome.results.is_empty());
        assert_eq!(outcome.skipped_events, 1);
    }

    #[test]
    fn no_offers_means_no_pairings() {
        let outcome =
            find_opportunities(&snapshot(), &[], &ArbitrageCalculator::default(), NOW);
        assert!(outcome.results.is_empty());
        assert!(outcome.rejected.is_empty());
    }
}
