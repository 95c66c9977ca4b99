//! End-to-end tests: scan a snapshot, store the results, aggregate the
//! stored records and render both reports.

use std::path::PathBuf;

use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use time::macros::{date, datetime};
use time::OffsetDateTime;

use bonus_arb::arbitrage::{evaluate, find_opportunities, ArbitrageCalculator};
use bonus_arb::bet::{BonusLeg, BonusOffer, HedgeLeg, OddsQuote};
use bonus_arb::report;
use bonus_arb::storage;
use bonus_arb::summary::{
    summarize_scan, BookPairStat, DailyStat, OpportunityAggregator, ScanRecord,
};

const SCANNED_AT: OffsetDateTime = datetime!(2026-02-18 07:52:47 UTC);
const AS_OF: OffsetDateTime = datetime!(2026-02-18 12:00 UTC);

fn temp_path(name: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("bonus_arb_it_{}_{}.json", name, std::process::id()));
    p
}

fn quote(book: &str, selection: &str, odds: i32) -> OddsQuote {
    OddsQuote {
        event: "LAL@BOS".to_string(),
        sportsbook: book.to_string(),
        selection: selection.to_string(),
        american_odds: odds,
    }
}

fn snapshot() -> Vec<OddsQuote> {
    vec![
        quote("DraftKings", "Lakers", 300),
        quote("DraftKings", "Celtics", -400),
        quote("FanDuel", "Lakers", 250),
        quote("FanDuel", "Celtics", -120),
        quote("BetMGM", "Lakers", 280),
        quote("BetMGM", "Celtics", -150),
    ]
}

fn offers() -> Vec<BonusOffer> {
    vec![BonusOffer {
        sportsbook: "DraftKings".to_string(),
        amount: dec!(100),
    }]
}

#[test]
fn scan_ranks_pairings_by_guaranteed_profit() {
    let outcome = find_opportunities(
        &snapshot(),
        &offers(),
        &ArbitrageCalculator::default(),
        SCANNED_AT,
    );

    let profits: Vec<Decimal> = outcome.results.iter().map(|r| r.guaranteed_profit).collect();
    assert_eq!(profits, vec![dec!(40), dec!(-50), dec!(-75), dec!(-75)]);
    assert_eq!(outcome.results[0].hedge_book(), "FanDuel");
    assert_eq!(outcome.results[0].hedge_stake, dec!(360));
    assert!(outcome.rejected.is_empty());

    let scan = summarize_scan(&outcome.results);
    assert_eq!(scan.total, 4);
    assert_eq!(scan.profitable, 1);
    assert_eq!(scan.total_guaranteed_profit, dec!(40));
    assert_eq!(scan.average_roi_pct, dec!(11.11));
}

#[test]
fn stored_scan_feeds_weekly_summary_and_reports() {
    let outcome = find_opportunities(
        &snapshot(),
        &offers(),
        &ArbitrageCalculator::default(),
        SCANNED_AT,
    );

    // Earlier runs: one inside the window, one before it
    let earlier = evaluate(
        BonusLeg::new("DraftKings", "Lakers", 300, dec!(50)),
        HedgeLeg::new("FanDuel", "Celtics", -120),
        datetime!(2026-02-15 20:00 UTC),
    )
    .unwrap();
    let stale = evaluate(
        BonusLeg::new("BetMGM", "Heat", 200, dec!(25)),
        HedgeLeg::new("Caesars", "Knicks", 110),
        datetime!(2026-02-05 09:00 UTC),
    )
    .unwrap();

    let latest_path = temp_path("latest");
    let history_path = temp_path("history");
    storage::save_results(&latest_path, &outcome.results).unwrap();

    let mut history = serde_json::to_value(vec![
        ScanRecord::from(earlier.clone()),
        ScanRecord::from(stale),
    ])
    .unwrap();
    if let serde_json::Value::Array(items) = &mut history {
        items.push(serde_json::json!({"bonus_leg": "not a leg"}));
    }
    std::fs::write(&history_path, history.to_string()).unwrap();

    let mut records = storage::load_records(&latest_path).unwrap();
    records.extend(storage::load_records(&history_path).unwrap());
    assert_eq!(records.len(), 7);

    let summary = OpportunityAggregator::new(5).aggregate(&records, AS_OF, 7);

    assert_eq!(summary.total_count, 5);
    assert_eq!(summary.profitable_count, 2);
    assert_eq!(summary.skipped_count, 1);
    assert_eq!(summary.total_profit, dec!(60));
    assert_eq!(summary.total_risk, dec!(1008.93));
    assert_eq!(summary.success_rate, dec!(40));
    assert_eq!(
        summary.daily_stats,
        vec![
            DailyStat {
                date: date!(2026 - 02 - 18),
                total_count: 4,
                profitable_count: 1,
                total_profit: dec!(40),
                total_risk: dec!(828.93),
            },
            DailyStat {
                date: date!(2026 - 02 - 15),
                total_count: 1,
                profitable_count: 1,
                total_profit: dec!(20),
                total_risk: dec!(180),
            },
        ]
    );
    assert_eq!(
        summary.book_pair_stats,
        vec![BookPairStat {
            bonus_book: "DraftKings".to_string(),
            hedge_book: "FanDuel".to_string(),
            count: 2,
            total_profit: dec!(60),
        }]
    );
    assert_eq!(summary.top_opportunities.len(), 2);
    assert_eq!(summary.top_opportunities[0], outcome.results[0]);
    assert_eq!(summary.top_opportunities[1], earlier);

    let weekly = report::this_week(&summary, AS_OF);
    assert!(weekly.contains("**7-day rolling summary as of 2026-02-18 12:00:00 UTC**"));
    assert!(weekly.contains("| 2026-02-15 | 1 | 1 | $20.00 | $180.00 |"));
    assert!(weekly.contains("| DraftKings → FanDuel | 2 | $60.00 |"));
    assert!(weekly.contains("- **Malformed records skipped:** 1"));

    let bets = report::bets_now(&outcome.results, 5, Decimal::ZERO, SCANNED_AT);
    assert!(bets.contains("## IMMEDIATE ACTION (1 bets)"));
    assert!(bets.contains("Bet **$360.00 on Celtics** @ -120 (real money)"));
    assert!(bets.contains("| **Total guaranteed profit** | $40.00 |"));

    std::fs::remove_file(&latest_path).unwrap();
    std::fs::remove_file(&history_path).unwrap();
}

#[test]
fn tight_stake_guard_flags_without_changing_numbers() {
    let loose = find_opportunities(
        &snapshot(),
        &offers(),
        &ArbitrageCalculator::default(),
        SCANNED_AT,
    );
    let tight = find_opportunities(
        &snapshot(),
        &offers(),
        &ArbitrageCalculator::new(dec!(4)),
        SCANNED_AT,
    );

    let loose_profits: Vec<Decimal> = loose.results.iter().map(|r| r.guaranteed_profit).collect();
    let tight_profits: Vec<Decimal> = tight.results.iter().map(|r| r.guaranteed_profit).collect();
    assert_eq!(loose_profits, tight_profits);

    // 450 / 100 is the only hedge above 4x the bonus
    assert!(loose.results.iter().all(|r| r.warnings.is_empty()));
    let flagged: Vec<Decimal> = tight
        .results
        .iter()
        .filter(|r| r.is_flagged())
        .map(|r| r.hedge_stake)
        .collect();
    assert_eq!(flagged, vec![dec!(450)]);
}
