//! Derived run artifacts: chart points, summary, narration, markdown.
//!
//! Everything here is a pure function of a finished run's snapshots and
//! events.

use serde::{Deserialize, Serialize};

use crate::engine::events::Event;
use crate::engine::ledger::PlayerStatus;
use crate::engine::state::PeriodSnapshot;
use crate::engine::RunMeta;
use crate::lottery::rules::{ADD_ON_PRICE, COMBINATIONS, TICKET_PRICE};
use crate::lottery::strategy::StrategyKind;

/// Events listed in the report before truncation.
pub const EVENT_INDEX_LIMIT: usize = 200;

/// One decimated chart sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Period index.
    pub index: usize,
    /// Jackpot at stake that period.
    pub jackpot: f64,
    /// `(player id, balance)` in roster order.
    pub balances: Vec<(String, f64)>,
    /// First-ranked player id.
    pub leader: Option<String>,
}

/// Sample every `interval`-th period, starting at period 0.
#[must_use]
pub fn chart_points(snapshots: &[PeriodSnapshot], interval: usize) -> Vec<ChartPoint> {
    snapshots
        .iter()
        .step_by(interval.max(1))
        .map(|s| ChartPoint {
            index: s.index,
            jackpot: s.jackpot,
            balances: s.players.iter().map(|p| (p.id.clone(), p.balance)).collect(),
            leader: s.leader().map(str::to_string),
        })
        .collect()
}

/// A player's final position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStanding {
    /// Identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Ticket strategy.
    pub strategy: StrategyKind,
    /// Final balance.
    pub balance: f64,
    /// Total spend.
    pub spent: f64,
    /// Total winnings.
    pub won: f64,
    /// Jackpot-tier tickets held.
    pub jackpot_hits: u32,
    /// Final status.
    pub status: PlayerStatus,
}

/// Aggregate results of a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Players by final balance, highest first.
    pub final_ranking: Vec<PlayerStanding>,
    /// Jackpot-tier tickets held by all players.
    pub player_jackpot_hits: u32,
    /// Periods with at least one market winner.
    pub market_hit_periods: usize,
    /// Longest run of periods without any jackpot winner.
    pub longest_jackpot_drought: usize,
}

/// Summarize a snapshot sequence.
#[must_use]
pub fn summarize(snapshots: &[PeriodSnapshot]) -> RunSummary {
    let Some(last) = snapshots.last() else {
        return RunSummary::default();
    };

    let mut final_ranking: Vec<PlayerStanding> = last
        .players
        .iter()
        .map(|p| PlayerStanding {
            id: p.id.clone(),
            name: p.name.clone(),
            strategy: p.strategy,
            balance: p.balance,
            spent: p.spent,
            won: p.won,
            jackpot_hits: p.total_jackpot_hits,
            status: p.status,
        })
        .collect();
    final_ranking.sort_by(|a, b| b.balance.total_cmp(&a.balance));

    let mut longest = 0;
    let mut current = 0;
    for snap in snapshots {
        if snap.jackpot_hit() {
            current = 0;
        } else {
            current += 1;
            longest = longest.max(current);
        }
    }

    RunSummary {
        player_jackpot_hits: final_ranking.iter().map(|p| p.jackpot_hits).sum(),
        final_ranking,
        market_hit_periods: snapshots.iter().filter(|s| s.market_winners > 0).count(),
        longest_jackpot_drought: longest,
    }
}

/// `[<draw id> <date>] <headline>` for each event.
#[must_use]
pub fn narration(events: &[Event]) -> Vec<String> {
    events
        .iter()
        .map(|e| format!("[{} {}] {}", e.draw_id, e.date, e.headline))
        .collect()
}

/// Compact money: `$1.23B`, `$45.6M`, `$7.8K`, `$42`.
#[must_use]
pub fn format_money(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1e9 {
        format!("${:.2}B", value / 1e9)
    } else if abs >= 1e6 {
        format!("${:.1}M", value / 1e6)
    } else if abs >= 1e3 {
        format!("${:.1}K", value / 1e3)
    } else {
        format!("${value:.0}")
    }
}

/// Percentage with two decimals.
#[must_use]
pub fn format_percent(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}

/// Sectioned markdown report.
#[must_use]
pub fn summary_report(meta: &RunMeta, summary: &RunSummary, events: &[Event]) -> String {
    let mut lines = vec![
        "# Lotto Logic: Simulation Summary".to_string(),
        String::new(),
        "## Experiment Overview".to_string(),
        format!("- Years simulated: {}", meta.years),
        format!(
            "- Draws resolved: {} of {}",
            meta.completed_periods, meta.total_periods
        ),
        format!("- First draw: {}", meta.start_date),
        format!("- Seed: {}", meta.seed),
        format!("- Add-on: {}", meta.add_on.label()),
        format!(
            "- Market efficiency: {:.4} (market only)",
            meta.efficiency
        ),
        format!(
            "- Ticket price: {} (add-ons +{})",
            format_money(TICKET_PRICE),
            format_money(ADD_ON_PRICE)
        ),
        format!("- Starting balance: {}", format_money(meta.starting_balance)),
        String::new(),
        "## Key Results".to_string(),
        format!(
            "- Draws with a market jackpot hit: {}",
            summary.market_hit_periods
        ),
        format!(
            "- Player jackpot hits (winning tickets across players): {}",
            summary.player_jackpot_hits
        ),
        format!(
            "- Longest jackpot drought (draws): {}",
            summary.longest_jackpot_drought
        ),
        "- Final ranking:".to_string(),
    ];

    for (rank, p) in summary.final_ranking.iter().enumerate() {
        let status = match p.status {
            PlayerStatus::Active => "Active",
            PlayerStatus::Eliminated => "Eliminated",
        };
        lines.push(format!(
            "  - #{} {} ({}): balance={}, spent={}, return={}, jackpot hits={}, status={status}",
            rank + 1,
            p.id,
            p.strategy,
            format_money(p.balance),
            format_money(p.spent),
            format_money(p.won),
            p.jackpot_hits
        ));
    }

    lines.push(String::new());
    lines.push("## Why It Looks Like This".to_string());
    lines.push(format!(
        "- The jackpot combination space is {COMBINATIONS}. No strategy brings a single ticket closer."
    ));
    lines.push(
        "- Market jackpot winners are Poisson with lambda = effective tickets / combinations."
            .to_string(),
    );
    lines.push("- Long stretches where nothing happens are expected under long odds.".to_string());
    lines.push(
        "- Filtering patterns changes the path and its variance, never the per-ticket jackpot odds."
            .to_string(),
    );
    lines.push(String::new());

    lines.push(format!("## Event Index (first {EVENT_INDEX_LIMIT})"));
    for e in events.iter().take(EVENT_INDEX_LIMIT) {
        lines.push(format!("- {}: {} {}", e.draw_id, e.category, e.headline));
    }
    if events.len() > EVENT_INDEX_LIMIT {
        lines.push(format!("- ... ({} more)", events.len() - EVENT_INDEX_LIMIT));
    }

    lines.join("\n")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::RunConfig;
    use crate::engine::events::EventCategory;
    use crate::engine::SimEngine;
    use chrono::NaiveDate;

    fn output(seed: u32, years: u32) -> crate::engine::RunOutput {
        SimEngine::new(RunConfig::builder().seed(seed).years(years).build())
            .unwrap()
            .run()
            .unwrap()
    }

    fn event(index: usize) -> Event {
        Event {
            index,
            draw_id: crate::engine::clock::draw_id(index),
            date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            category: EventCategory::LongRollover,
            headline: "Jackpot rolled 80 draws in a row.".into(),
            rationale: String::new(),
            caveat: String::new(),
        }
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(1_500_000_000.0), "$1.50B");
        assert_eq!(format_money(20_000_000.0), "$20.0M");
        assert_eq!(format_money(12_345.0), "$12.3K");
        assert_eq!(format_money(42.4), "$42");
        assert_eq!(format_percent(0.1234), "12.34%");
    }

    #[test]
    fn test_narration_format() {
        let lines = narration(&[event(3)]);
        assert_eq!(lines, vec!["[Y1-W2-D1 2025-01-01] Jackpot rolled 80 draws in a row."]);
    }

    #[test]
    fn test_summary_matches_snapshots() {
        let out = output(31, 3);
        let summary = &out.summary;
        let last = out.snapshots.last().unwrap();

        assert_eq!(summary.final_ranking.len(), last.players.len());
        for pair in summary.final_ranking.windows(2) {
            assert!(pair[0].balance >= pair[1].balance);
        }
        let hits: u32 = last.players.iter().map(|p| p.total_jackpot_hits).sum();
        assert_eq!(summary.player_jackpot_hits, hits);
        let market = out.snapshots.iter().filter(|s| s.market_winners >= 1).count();
        assert_eq!(summary.market_hit_periods, market);
        assert!(summary.longest_jackpot_drought <= out.snapshots.len());
    }

    #[test]
    fn test_longest_drought_counts_gaps() {
        let mut snaps = output(31, 1).snapshots;
        for s in &mut snaps {
            s.total_winners = 0;
        }
        snaps[5].total_winners = 1;
        snaps[100].total_winners = 2;
        // Gaps: 0..5 (5), 6..100 (94), 101..156 (55).
        assert_eq!(summarize(&snaps).longest_jackpot_drought, 94);
    }

    #[test]
    fn test_empty_run_summary() {
        let summary = summarize(&[]);
        assert!(summary.final_ranking.is_empty());
        assert_eq!(summary.longest_jackpot_drought, 0);
    }

    #[test]
    fn test_chart_points_decimated() {
        let out = output(8, 1);
        let points = chart_points(&out.snapshots, 10);
        assert_eq!(points.len(), 16);
        assert_eq!(points[3].index, 30);
        assert_eq!(points[3].balances.len(), 3);
        assert_eq!(points[3].leader.as_deref(), out.snapshots[30].leader());
    }

    #[test]
    fn test_report_sections_and_cap() {
        let out = output(8, 1);
        let events: Vec<Event> = (0..205).map(event).collect();
        let report = summary_report(&out.meta, &out.summary, &events);
        for heading in [
            "## Experiment Overview",
            "## Key Results",
            "## Why It Looks Like This",
            "## Event Index (first 200)",
        ] {
            assert!(report.contains(heading), "missing {heading}");
        }
        assert!(report.contains("292201338"));
        assert!(report.ends_with("- ... (5 more)"));
        assert_eq!(report.matches("LONG_ROLL").count(), 200);
    }
}
