//! Markdown reports for the "bets now" and weekly views.
//!
//! Reports read results and summaries as computed; they never recompute
//! profit or re-rank beyond ordering what they are given.

use rust_decimal::Decimal;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};
use tracing::debug;

use crate::arbitrage::{ArbitrageResult, StakeWarning};
use crate::summary::WeeklySummary;

fn timestamp(at: OffsetDateTime) -> String {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second] UTC");
    let utc = at.to_offset(UtcOffset::UTC);
    utc.format(format).unwrap_or_else(|_| utc.to_string())
}

fn money(amount: Decimal) -> String {
    if amount.is_sign_negative() && !amount.is_zero() {
        format!("-${:.2}", amount.abs())
    } else {
        format!("${:.2}", amount)
    }
}

fn signed_money(amount: Decimal) -> String {
    if amount.is_sign_negative() && !amount.is_zero() {
        money(amount)
    } else {
        format!("+{}", money(amount))
    }
}

fn odds(american: i32) -> String {
    if american > 0 {
        format!("+{american}")
    } else {
        american.to_string()
    }
}

fn pairing_title(result: &ArbitrageResult) -> String {
    format!(
        "{} ({} {}) → {} ({} {})",
        result.bonus_book(),
        result.bonus_leg.leg.selection,
        odds(result.bonus_leg.leg.american_odds),
        result.hedge_book(),
        result.hedge_leg.leg.selection,
        odds(result.hedge_leg.leg.american_odds),
    )
}

fn warning_lines(result: &ArbitrageResult) -> String {
    result
        .warnings
        .iter()
        .map(|w| match w {
            StakeWarning::UnboundedHedge {
                hedge_stake,
                multiple,
            } => format!(
                "**Warning:** hedge stake {} is {}x the bonus; check limits before placing.\n\n",
                money(*hedge_stake),
                multiple.normalize()
            ),
        })
        .collect()
}

/// Render the list of bets to place now.
///
/// Only results with guaranteed profit above both zero and `min_profit` are
/// listed, best first, at most `top_n` of them.
pub fn bets_now(
    results: &[ArbitrageResult],
    top_n: usize,
    min_profit: Decimal,
    generated_at: OffsetDateTime,
) -> String {
    let floor = min_profit.max(Decimal::ZERO);
    let mut actionable: Vec<&ArbitrageResult> = results
        .iter()
        .filter(|r| r.guaranteed_profit > floor)
        .collect();
    debug!(
        handed = results.len(),
        actionable = actionable.len(),
        "Dropped results at or below the profit floor"
    );
    actionable.sort_by(|a, b| b.guaranteed_profit.cmp(&a.guaranteed_profit));

    let mut md = format!(
        "# BETS TO PLACE NOW\n\n**Last Updated:** {}\n\n---\n\n## IMMEDIATE ACTION ({} bets)\n\n",
        timestamp(generated_at),
        actionable.len()
    );

    let listed: Vec<&ArbitrageResult> = actionable.iter().take(top_n).copied().collect();
    let mut total_profit = Decimal::ZERO;
    let mut total_risk = Decimal::ZERO;

    for (i, result) in listed.iter().enumerate() {
        total_profit += result.guaranteed_profit;
        total_risk += result.real_money_risk();

        let bonus = &result.bonus_leg;
        let hedge = &result.hedge_leg;
        md.push_str(&format!(
            "### #{} {} → {}\n\n\
             **Guaranteed Profit:** {}  \n\
             **Your Risk (Real Money):** {}  \n\
             **ROI:** {:.1}%  \n\n\
             **Steps:**\n\
             1. Go to {}\n\
             2. Bet **{} on {}** @ {} (use bonus credit)\n\
             3. Go to {}\n\
             4. Bet **{} on {}** @ {} (real money)\n\n\
             **Outcomes:**\n\
             - If {} wins: **{}**\n\
             - If {} wins: **{}**\n\
             - **Profit either way: {}**\n\n",
            i + 1,
            result.bonus_book(),
            result.hedge_book(),
            money(result.guaranteed_profit),
            money(result.real_money_risk()),
            result.roi_pct,
            result.bonus_book(),
            money(bonus.bonus_amount),
            bonus.leg.selection,
            odds(bonus.leg.american_odds),
            result.hedge_book(),
            money(result.hedge_stake),
            hedge.leg.selection,
            odds(hedge.leg.american_odds),
            bonus.leg.selection,
            signed_money(result.profit_if_bonus_wins),
            hedge.leg.selection,
            signed_money(result.profit_if_hedge_wins),
            money(result.guaranteed_profit),
        ));
        md.push_str(&warning_lines(result));
        md.push_str("---\n\n");
    }

    if listed.is_empty() {
        md.push_str(&format!(
            "## NO PROFITABLE BETS RIGHT NOW\n\n\
             {} pairings evaluated; none clear the {} guaranteed-profit floor.\n\n---\n",
            results.len(),
            money(floor)
        ));
    } else {
        let average_roi: Decimal = listed.iter().map(|r| r.roi_pct).sum::<Decimal>()
            / Decimal::from(listed.len() as u64);
        md.push_str(&format!(
            "## SUMMARY\n\n\
             | Stat | Value |\n\
             |------|-------|\n\
             | **Bets to place** | {} |\n\
             | **Total guaranteed profit** | {} |\n\
             | **Total real money at risk** | {} |\n\
             | **Average ROI per bet** | {:.1}% |\n\n---\n",
            listed.len(),
            money(total_profit),
            money(total_risk),
            average_roi,
        ));
    }

    md
}

/// Render the rolling weekly view of a summary.
pub fn this_week(summary: &WeeklySummary, generated_at: OffsetDateTime) -> String {
    let mut md = format!(
        "# THIS WEEK'S OPPORTUNITIES\n\n\
         **{}-day rolling summary as of {}**\n\n---\n\n\
         ## PROFIT SUMMARY\n\n\
         | Date | Total | Profitable | Profit | Risk |\n\
         |------|-------|-----------|--------|------|\n",
        summary.window_days,
        timestamp(summary.as_of),
    );

    for day in &summary.daily_stats {
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            day.date,
            day.total_count,
            day.profitable_count,
            money(day.total_profit),
            money(day.total_risk),
        ));
    }

    md.push_str(&format!(
        "\n**Week Total:** {} profitable = **{}** guaranteed profit\n\n---\n\n## TOP OPPORTUNITIES\n\n",
        summary.profitable_count,
        money(summary.total_profit)
    ));

    if summary.top_opportunities.is_empty() {
        md.push_str("No profitable opportunities in this window.\n\n");
    }
    for (i, result) in summary.top_opportunities.iter().enumerate() {
        md.push_str(&format!(
            "### {}. {}\n- **Profit:** {}\n- **ROI:** {:.1}%\n- **Found:** {}\n\n",
            i + 1,
            pairing_title(result),
            money(result.guaranteed_profit),
            result.roi_pct,
            timestamp(result.discovered_at),
        ));
    }

    md.push_str(&format!(
        "---\n\n## STATISTICS\n\n\
         - **Total opportunities:** {}\n\
         - **Profitable:** {}\n\
         - **Success rate:** {:.1}%\n\
         - **Available profit:** {}\n\
         - **Real money at risk:** {}\n",
        summary.total_count,
        summary.profitable_count,
        summary.success_rate,
        money(summary.total_profit),
        money(summary.total_risk),
    ));
    if summary.skipped_count > 0 {
        md.push_str(&format!(
            "- **Malformed records skipped:** {}\n",
            summary.skipped_count
        ));
    }

    md.push_str(
        "\n---\n\n## BY SPORTSBOOK PAIR\n\n\
         | Books | Count | Total Profit |\n\
         |-------|-------|--------------|\n",
    );
    for pair in &summary.book_pair_stats {
        md.push_str(&format!(
            "| {} → {} | {} | {} |\n",
            pair.bonus_book,
            pair.hedge_book,
            pair.count,
            money(pair.total_profit),
        ));
    }

    md.push_str(&format!(
        "\n---\n\n**Generated:** {}\n",
        timestamp(generated_at)
    ));

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arbitrage::evaluate;
    use crate::bet::{BonusLeg, HedgeLeg};
    use crate::summary::aggregate;
    use crate::summary::ScanRecord;
    use rust_decimal_macros::dec;
    use time::macros::datetime;

    const NOW: OffsetDateTime = datetime!(2026-02-18 07:52:47 UTC);

    fn result(bonus_odds: i32, hedge_odds: i32, amount: Decimal) -> ArbitrageResult {
        evaluate(
            BonusLeg::new("DraftKings", "Los Angeles Lakers", bonus_odds, amount),
            HedgeLeg::new("FanDuel", "Boston Celtics", hedge_odds),
            NOW,
        )
        .unwrap()
    }

    #[test]
    fn money_formatting() {
        assert_eq!(money(dec!(757.58)), "$757.58");
        assert_eq!(money(dec!(-166.67)), "-$166.67");
        assert_eq!(signed_money(dec!(40)), "+$40.00");
        assert_eq!(signed_money(dec!(-166.67)), "-$166.67");
        assert_eq!(odds(110), "+110");
        assert_eq!(odds(-120), "-120");
    }

    #[test]
    fn bets_now_lists_only_profitable() {
        let results = vec![result(-120, 110, dec!(1000)), result(300, -120, dec!(100))];
        let md = bets_now(&results, 5, Decimal::ZERO, NOW);

        assert!(md.contains("## IMMEDIATE ACTION (1 bets)"));
        assert!(md.contains("### #1 DraftKings → FanDuel"));
        assert!(md.contains("**Guaranteed Profit:** $40.00"));
        assert!(md.contains("Bet **$100.00 on Los Angeles Lakers** @ +300"));
        assert!(md.contains("Bet **$360.00 on Boston Celtics** @ -120"));
        assert!(md.contains("If Boston Celtics wins: **+$200.00**"));
        assert!(!md.contains("-$166.67"));
        assert!(md.contains("**Last Updated:** 2026-02-18 07:52:47 UTC"));
    }

    #[test]
    fn bets_now_without_actionable_results() {
        let results = vec![result(-120, 110, dec!(1000))];
        let md = bets_now(&results, 5, dec!(10), NOW);

        assert!(md.contains("## NO PROFITABLE BETS RIGHT NOW"));
        assert!(md.contains("$10.00 guaranteed-profit floor"));
        assert!(!md.contains("## SUMMARY"));
    }

    #[test]
    fn bets_now_shows_stake_warnings() {
        // +10000 bonus against +100 hedge: profitable but 100x the bonus
        let results = vec![result(10000, 100, dec!(10))];
        let md = bets_now(&results, 5, Decimal::ZERO, NOW);

        assert!(md.contains("**Guaranteed Profit:** $10.00"));
        assert!(md.contains("**Warning:** hedge stake $1000.00 is 100x the bonus"));
    }

    #[test]
    fn this_week_renders_all_sections() {
        let records: Vec<ScanRecord> = vec![
            result(300, -120, dec!(100)).into(),
            result(-120, 110, dec!(1000)).into(),
            ScanRecord::default(),
        ];
        let summary = aggregate(&records, NOW, 7);
        let md = this_week(&summary, NOW);

        assert!(md.contains("| 2026-02-18 | 2 | 1 | $40.00 | $1117.58 |"));
        assert!(md.contains(
            "### 1. DraftKings (Los Angeles Lakers +300) → FanDuel (Boston Celtics -120)"
        ));
        assert!(md.contains("- **Success rate:** 50.0%"));
        assert!(md.contains("- **Malformed records skipped:** 1"));
        assert!(md.contains("| DraftKings → FanDuel | 1 | $40.00 |"));
    }

    #[test]
    fn this_week_with_empty_summary() {
        let summary = aggregate(&[], NOW, 7);
        let md = this_week(&summary, NOW);

        assert!(md.contains("No profitable opportunities in this window."));
        assert!(md.contains("- **Total opportunities:** 0"));
        assert!(!md.contains("Malformed"));
    }
}
