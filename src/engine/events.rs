//! Narrative events derived from the snapshot stream.
//!
//! The detector only reads snapshots. Feeding it the same stream twice
//! gives the same events, and it never touches the run itself.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::engine::state::PeriodSnapshot;
use crate::report::format_money;

/// Detector thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NarrativeConfig {
    /// Market hit-probability levels; each fires once.
    #[serde(default = "default_thresholds")]
    pub hit_probability_thresholds: Vec<f64>,
    /// Consecutive prize-free periods that make a dry spell.
    #[serde(default = "default_dry_spell")]
    pub dry_spell_periods: u32,
    /// Consecutive rollovers that make a long rollover.
    #[serde(default = "default_rollover")]
    pub rollover_periods: u32,
    /// Periods between chart points.
    #[serde(default = "default_chart_interval")]
    pub chart_interval: usize,
}

fn default_thresholds() -> Vec<f64> {
    vec![0.05, 0.10, 0.15]
}

const fn default_dry_spell() -> u32 {
    60
}

const fn default_rollover() -> u32 {
    80
}

const fn default_chart_interval() -> usize {
    10
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            hit_probability_thresholds: default_thresholds(),
            dry_spell_periods: default_dry_spell(),
            rollover_periods: default_rollover(),
            chart_interval: default_chart_interval(),
        }
    }
}

impl NarrativeConfig {
    /// Copy with thresholds in (0, 1], sorted and deduplicated, and every
    /// length at least one.
    #[must_use]
    pub fn clamped(&self) -> Self {
        let mut thresholds: Vec<f64> = self
            .hit_probability_thresholds
            .iter()
            .copied()
            .filter(|t| t.is_finite() && *t > 0.0 && *t <= 1.0)
            .collect();
        thresholds.sort_by(f64::total_cmp);
        thresholds.dedup();
        Self {
            hit_probability_thresholds: thresholds,
            dry_spell_periods: self.dry_spell_periods.max(1),
            rollover_periods: self.rollover_periods.max(1),
            chart_interval: self.chart_interval.max(1),
        }
    }
}

/// What kind of moment an event marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventCategory {
    /// A player could no longer afford a ticket.
    Elimination,
    /// Someone hit the jackpot.
    JackpotHit,
    /// Market hit probability reached a configured level.
    HitProbability,
    /// Nobody won anything for a long stretch.
    DrySpell,
    /// The jackpot rolled over for a long stretch.
    LongRollover,
    /// A different player took first place.
    LeaderChange,
}

impl EventCategory {
    /// Short tag used in reports.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Elimination => "ELIMINATED",
            Self::JackpotHit => "JACKPOT_HIT",
            Self::HitProbability => "PHIT_THRESHOLD",
            Self::DrySpell => "DRY_SPELL",
            Self::LongRollover => "LONG_ROLL",
            Self::LeaderChange => "RANK_FLIP",
        }
    }
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// A notable moment in a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Period index.
    pub index: usize,
    /// Period label.
    pub draw_id: String,
    /// Period date.
    pub date: NaiveDate,
    /// Kind of event.
    pub category: EventCategory,
    /// One-line description.
    pub headline: String,
    /// What drives it.
    pub rationale: String,
    /// What not to read into it.
    pub caveat: String,
}

/// Streaming event detector.
#[derive(Debug, Clone)]
pub struct EventDetector {
    config: NarrativeConfig,
    fired: Vec<bool>,
    dry_streak: u32,
    roll_streak: u32,
    previous_leader: Option<String>,
}

impl EventDetector {
    /// Detector with clamped thresholds.
    #[must_use]
    pub fn new(config: &NarrativeConfig) -> Self {
        let config = config.clamped();
        Self {
            fired: vec![false; config.hit_probability_thresholds.len()],
            config,
            dry_streak: 0,
            roll_streak: 0,
            previous_leader: None,
        }
    }

    /// Events for the next snapshot, in emission order.
    pub fn observe(&mut self, snap: &PeriodSnapshot) -> Vec<Event> {
        let mut events = Vec::new();
        let mut push = |category, headline: String, rationale: &str, caveat: &str| {
            events.push(Event {
                index: snap.index,
                draw_id: snap.draw_id.clone(),
                date: snap.date,
                category,
                headline,
                rationale: rationale.to_string(),
                caveat: caveat.to_string(),
            });
        };

        for player in snap.players.iter().filter(|p| p.eliminated_now) {
            push(
                EventCategory::Elimination,
                format!("{} ran out of funds. Eliminated.", player.id),
                "Ticket cost exceeded remaining cash.",
                "Bankruptcy is a normal outcome under long odds.",
            );
        }

        if snap.jackpot_hit() {
            self.roll_streak = 0;
            push(
                EventCategory::JackpotHit,
                format!(
                    "Jackpot hit. {} split {} way(s); reset to {} next draw.",
                    format_money(snap.jackpot),
                    snap.total_winners,
                    format_money(snap.next_jackpot)
                ),
                &format!(
                    "Market expected winners were {:.4}; {} of the {} winning tickets were held by players, and the pool is split evenly per ticket.",
                    snap.lambda,
                    snap.player_jackpot_hits(),
                    snap.total_winners
                ),
                "Every ticket had the same 1-in-292,201,338 chance, whatever strategy picked it.",
            );
        } else {
            self.roll_streak += 1;
        }

        for (threshold, fired) in self
            .config
            .hit_probability_thresholds
            .iter()
            .zip(self.fired.iter_mut())
        {
            if !*fired && snap.hit_probability >= *threshold {
                *fired = true;
                push(
                    EventCategory::HitProbability,
                    format!("P(Hit) crossed {:.0}%.", threshold * 100.0),
                    "P(Hit) = 1 - exp(-lambda), the chance that at least one market ticket hits the jackpot this draw.",
                    "Higher sales raise lambda, but that still does not imply frequent winners.",
                );
            }
        }

        if snap.any_prize() {
            self.dry_streak = 0;
        } else {
            self.dry_streak += 1;
        }
        if self.dry_streak == self.config.dry_spell_periods {
            push(
                EventCategory::DrySpell,
                format!("No one hit anything for {} draws.", self.dry_streak),
                "Long quiet stretches are expected under long odds.",
                "Nothing happened again, and that is the point.",
            );
        }

        if self.roll_streak == self.config.rollover_periods {
            push(
                EventCategory::LongRollover,
                format!("Jackpot rolled {} draws in a row.", self.roll_streak),
                "Rollover streaks are normal while the market's lambda stays small.",
                "The pot grows, and intuition starts to overreact.",
            );
        }

        let leader = snap.leader().map(str::to_string);
        if snap.index > 0 {
            if let (Some(now), Some(before)) = (&leader, &self.previous_leader) {
                if now != before {
                    push(
                        EventCategory::LeaderChange,
                        format!("Lead changed: {now} is now #1."),
                        "Short-term leads are dominated by variance; strategy does not change per-ticket jackpot odds.",
                        "A lead is a path property, not proof of skill.",
                    );
                }
            }
        }
        self.previous_leader = leader;

        events
    }
}

/// Run the detector over a whole snapshot sequence.
#[must_use]
pub fn detect_events(config: &NarrativeConfig, snapshots: &[PeriodSnapshot]) -> Vec<Event> {
    let mut detector = EventDetector::new(config);
    snapshots.iter().flat_map(|s| detector.observe(s)).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::engine::ledger::PlayerStatus;
    use crate::engine::state::PlayerPeriod;
    use crate::lottery::draw::{PeriodDraws, Ticket};
    use crate::lottery::rules::AddOnMode;
    use crate::lottery::strategy::StrategyKind;

    fn player(id: &str, balance: f64) -> PlayerPeriod {
        PlayerPeriod {
            id: id.to_string(),
            name: format!("Player {id}"),
            strategy: StrategyKind::QuickPick,
            tickets: Vec::new(),
            cost: 0.0,
            prize_cash: 0.0,
            jackpot_hits: 0,
            jackpot_cash: 0.0,
            balance,
            spent: 0.0,
            won: 0.0,
            total_jackpot_hits: 0,
            status: PlayerStatus::Active,
            eliminated_now: false,
        }
    }

    fn snapshot(index: usize, hit_probability: f64) -> PeriodSnapshot {
        let draw = Ticket::new([1, 2, 3, 4, 5], 1).unwrap();
        PeriodSnapshot {
            index,
            draw_id: crate::engine::clock::draw_id(index),
            date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            weekday: chrono::Weekday::Wed,
            add_on: AddOnMode::None,
            jackpot: 20e6,
            next_jackpot: 21e6,
            tickets_sold: 0,
            effective_tickets: 0.0,
            lambda: 0.0,
            hit_probability,
            market_winners: 0,
            total_winners: 0,
            jackpot_share: None,
            draws: PeriodDraws {
                main: draw,
                double_play: None,
                multiplier: 1,
            },
            players: vec![player("A", 100.0), player("B", 50.0)],
            ranking: vec!["A".into(), "B".into()],
            last_jackpot_period: None,
        }
    }

    fn count(events: &[Event], category: EventCategory) -> usize {
        events.iter().filter(|e| e.category == category).count()
    }

    #[test]
    fn test_threshold_fires_once_at_first_crossing() {
        let probs = [0.01, 0.04, 0.11, 0.09, 0.12, 0.20];
        let snaps: Vec<_> = probs.iter().enumerate().map(|(i, &p)| snapshot(i, p)).collect();
        let events = detect_events(&NarrativeConfig::default(), &snaps);
        let ten: Vec<_> = events
            .iter()
            .filter(|e| e.headline == "P(Hit) crossed 10%.")
            .collect();
        assert_eq!(ten.len(), 1);
        assert_eq!(ten[0].index, 2);
        // 5% and 10% fire together at index 2, 15% at index 5.
        assert_eq!(count(&events, EventCategory::HitProbability), 3);
        assert_eq!(events.last().unwrap().index, 5);
    }

    #[test]
    fn test_dry_spell_fires_at_exact_length() {
        let config = NarrativeConfig {
            dry_spell_periods: 3,
            ..NarrativeConfig::default()
        };
        let mut snaps: Vec<_> = (0..8).map(|i| snapshot(i, 0.0)).collect();
        snaps[4].players[0].prize_cash = 4.0;
        let events = detect_events(&config, &snaps);
        let dry: Vec<_> = events
            .iter()
            .filter(|e| e.category == EventCategory::DrySpell)
            .map(|e| e.index)
            .collect();
        // Streak 1,2,3 (fire at 2), reset at 4, then 1,2,3 again (fire at 7).
        assert_eq!(dry, vec![2, 7]);
    }

    #[test]
    fn test_market_winner_breaks_dry_spell_and_rollover() {
        let config = NarrativeConfig {
            dry_spell_periods: 2,
            rollover_periods: 2,
            ..NarrativeConfig::default()
        };
        let mut snaps: Vec<_> = (0..3).map(|i| snapshot(i, 0.0)).collect();
        snaps[1].market_winners = 1;
        snaps[1].total_winners = 1;
        let events = detect_events(&config, &snaps);
        assert_eq!(count(&events, EventCategory::JackpotHit), 1);
        assert_eq!(count(&events, EventCategory::DrySpell), 0);
        assert_eq!(count(&events, EventCategory::LongRollover), 0);
    }

    #[test]
    fn test_long_rollover_fires_once_per_streak() {
        let config = NarrativeConfig {
            rollover_periods: 4,
            ..NarrativeConfig::default()
        };
        let snaps: Vec<_> = (0..10).map(|i| snapshot(i, 0.0)).collect();
        let events = detect_events(&config, &snaps);
        let rolls: Vec<_> = events
            .iter()
            .filter(|e| e.category == EventCategory::LongRollover)
            .collect();
        assert_eq!(rolls.len(), 1);
        assert_eq!(rolls[0].index, 3);
    }

    #[test]
    fn test_leader_change() {
        let mut snaps: Vec<_> = (0..3).map(|i| snapshot(i, 0.0)).collect();
        snaps[0].ranking = vec!["B".into(), "A".into()];
        snaps[2].ranking = vec!["B".into(), "A".into()];
        let events = detect_events(&NarrativeConfig::default(), &snaps);
        let flips: Vec<_> = events
            .iter()
            .filter(|e| e.category == EventCategory::LeaderChange)
            .map(|e| (e.index, e.headline.as_str()))
            .collect();
        assert_eq!(
            flips,
            vec![(1, "Lead changed: A is now #1."), (2, "Lead changed: B is now #1.")]
        );
    }

    #[test]
    fn test_emission_order_within_period() {
        let config = NarrativeConfig {
            rollover_periods: 1,
            ..NarrativeConfig::default()
        };
        let mut snap = snapshot(0, 0.5);
        snap.players[1].eliminated_now = true;
        snap.players[1].status = PlayerStatus::Eliminated;
        let events = detect_events(&config, &[snap]);
        let order: Vec<_> = events.iter().map(|e| e.category).collect();
        assert_eq!(
            order,
            vec![
                EventCategory::Elimination,
                EventCategory::HitProbability,
                EventCategory::HitProbability,
                EventCategory::HitProbability,
                EventCategory::LongRollover,
            ]
        );
    }

    #[test]
    fn test_clamped_thresholds() {
        let config = NarrativeConfig {
            hit_probability_thresholds: vec![0.2, f64::NAN, -1.0, 0.1, 0.2, 3.0],
            dry_spell_periods: 0,
            rollover_periods: 0,
            chart_interval: 0,
        }
        .clamped();
        assert_eq!(config.hit_probability_thresholds, vec![0.1, 0.2]);
        assert_eq!(config.dry_spell_periods, 1);
        assert_eq!(config.chart_interval, 1);
    }
}
