//! Core simulation engine.
//!
//! Implements the draw-by-draw run loop with:
//! - One deterministic RNG stream consumed in a fixed per-period order
//! - Explicit state threading (`RunState` in, `RunState` out)
//! - Jidoka guards for stop-on-error
//! - Streaming event detection
//!
//! # Period order
//!
//! ```text
//! sales noise -> lambda -> market winners -> main draw -> double play draw
//!   -> multiplier -> players in roster order -> jackpot resolution
//! ```

pub mod clock;
pub mod events;
pub mod jidoka;
pub mod ledger;
pub mod rng;
pub mod state;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use clock::DrawClock;
pub use events::{detect_events, Event, EventCategory, EventDetector, NarrativeConfig};
pub use jidoka::{JidokaGuard, JidokaViolation};
pub use ledger::{JackpotState, Player, PlayerStatus};
pub use rng::SimRng;
pub use state::{PeriodSnapshot, PlayerPeriod, RunState};

use crate::config::{PlayerConfig, RunConfig};
use crate::error::{SimError, SimResult};
use crate::lottery::draw::PeriodDraws;
use crate::lottery::economics::tickets_sold;
use crate::lottery::rules::{AddOnMode, COMBINATIONS};
use crate::lottery::strategy::{build_strategy, TicketStrategy};
use crate::report::{chart_points, summarize, ChartPoint, RunSummary};

/// Lowest market efficiency.
pub const MARKET_EFFICIENCY_MIN: f64 = 0.95;
/// Width of the market efficiency range.
pub const MARKET_EFFICIENCY_SPREAD: f64 = 0.02;

/// Main simulation engine.
///
/// Holds only immutable run inputs; everything that changes lives in
/// [`RunState`].
///
/// # Example
///
/// ```rust
/// use lotto_logic::prelude::*;
///
/// let config = RunConfig::builder().seed(42).years(1).build();
/// let output = SimEngine::new(config).unwrap().run().unwrap();
/// assert_eq!(output.snapshots.len(), 156);
/// ```
#[derive(Debug)]
pub struct SimEngine {
    /// Clamped configuration.
    config: RunConfig,
    /// Enabled players in roster order.
    roster: Vec<PlayerConfig>,
    /// One generator per roster entry.
    strategies: Vec<Box<dyn TicketStrategy + Send + Sync>>,
    /// Jidoka guard for invariant checks.
    jidoka: JidokaGuard,
}

impl SimEngine {
    /// Create an engine from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if configuration validation fails.
    pub fn new(config: RunConfig) -> SimResult<Self> {
        config.check()?;
        let config = config.clamped();
        let roster = config.roster();
        let fixed = config.fixed_ticket_set()?;
        let strategies = roster
            .iter()
            .map(|p| build_strategy(p.strategy, &config.filter, fixed.as_ref()))
            .collect::<SimResult<Vec<_>>>()?;

        Ok(Self {
            config,
            roster,
            strategies,
            jidoka: JidokaGuard::new(),
        })
    }

    /// Clamped configuration in use.
    #[must_use]
    pub const fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Players taking part, in roster order.
    #[must_use]
    pub fn roster(&self) -> &[PlayerConfig] {
        &self.roster
    }

    /// Periods in a full run.
    #[must_use]
    pub fn total_periods(&self) -> usize {
        self.config.total_periods()
    }

    /// State before the first period. Draws the market efficiency.
    #[must_use]
    pub fn initial_state(&self) -> RunState {
        let mut rng = SimRng::new(u64::from(self.config.seed));
        let efficiency = rng.gen_f64().mul_add(MARKET_EFFICIENCY_SPREAD, MARKET_EFFICIENCY_MIN);
        let players = self
            .roster
            .iter()
            .map(|p| Player::new(p, self.config.starting_balance))
            .collect();

        RunState {
            rng,
            clock: DrawClock::new(self.config.start_date),
            jackpot: JackpotState::new(self.config.start_jackpot),
            players,
            efficiency,
            last_jackpot_period: None,
        }
    }

    /// Resolve one period.
    #[must_use]
    pub fn advance(&self, mut state: RunState) -> (RunState, PeriodSnapshot) {
        let index = state.clock.period();
        let date = state.clock.current_date();
        let weekday = state.clock.weekday();
        let jackpot = state.jackpot.value();
        let add_on = self.config.add_on;
        let cost = add_on.ticket_cost();

        // Market
        let sold = tickets_sold(jackpot, weekday, &mut state.rng);
        let effective_tickets = sold as f64 * state.efficiency;
        let lambda = effective_tickets / COMBINATIONS as f64;
        let hit_probability = 1.0 - (-lambda).exp();
        let market_winners = state.rng.gen_poisson(lambda);

        let draws = PeriodDraws::draw(add_on, &mut state.rng);

        // Players
        let mut records = Vec::with_capacity(state.players.len());
        for (player, strategy) in state.players.iter_mut().zip(&self.strategies) {
            let mut record = PlayerPeriod::idle(player);
            if player.is_active() {
                let count = player.affordable_tickets(cost);
                if count == 0 {
                    player.eliminate();
                    record.eliminated_now = true;
                    log::debug!("{} eliminated at {}", player.id, state.clock.draw_id());
                } else {
                    let spend = count as f64 * cost;
                    player.debit(spend);
                    let tickets = strategy.generate(count, &mut state.rng);
                    for ticket in &tickets {
                        let outcome = draws.settle(ticket, add_on);
                        record.prize_cash += outcome.cash;
                        record.jackpot_hits += outcome.jackpot_hits;
                    }
                    player.credit(record.prize_cash);
                    record.cost = spend;
                    record.tickets = tickets;
                }
            }
            records.push(record);
        }

        // Jackpot
        let hits: Vec<u32> = records.iter().map(|r| r.jackpot_hits).collect();
        let split = ledger::split_jackpot(jackpot, market_winners, &hits);
        let total_winners = split.as_ref().map_or(0, |s| s.total_winners);
        if let Some(split) = &split {
            for ((player, record), payout) in state
                .players
                .iter_mut()
                .zip(records.iter_mut())
                .zip(&split.payouts)
            {
                if record.jackpot_hits > 0 {
                    player.credit(*payout);
                    player.jackpot_hits += record.jackpot_hits;
                    record.jackpot_cash = *payout;
                }
            }
            log::debug!(
                "jackpot of {jackpot:.0} hit at {} by {total_winners} winner(s)",
                state.clock.draw_id()
            );
            state.jackpot.reset();
            state.last_jackpot_period = Some(index);
        } else {
            state.jackpot.grow(sold);
        }

        for (record, player) in records.iter_mut().zip(&state.players) {
            record.sync_totals(player);
        }

        let snapshot = PeriodSnapshot {
            index,
            draw_id: state.clock.draw_id(),
            date,
            weekday,
            add_on,
            jackpot,
            next_jackpot: state.jackpot.value(),
            tickets_sold: sold,
            effective_tickets,
            lambda,
            hit_probability,
            market_winners,
            total_winners,
            jackpot_share: split.map(|s| s.share),
            draws,
            players: records,
            ranking: ledger::ranking(&state.players),
            last_jackpot_period: state.last_jackpot_period,
        };

        state.clock.tick();
        (state, snapshot)
    }

    /// Run every period.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvariantViolation` if a period breaks an invariant.
    pub fn run(&self) -> SimResult<RunOutput> {
        self.run_until(|_| false)
    }

    /// Run until `stop` returns true for a finished period, or the run ends.
    ///
    /// The predicate sees each snapshot after it is resolved, so a run is
    /// only ever cut between whole periods.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvariantViolation` if a period breaks an invariant.
    pub fn run_until<F>(&self, mut stop: F) -> SimResult<RunOutput>
    where
        F: FnMut(&PeriodSnapshot) -> bool,
    {
        let total = self.total_periods();
        log::info!(
            "starting run: seed={} periods={total} players={} add_on={}",
            self.config.seed,
            self.roster.len(),
            self.config.add_on
        );

        let mut state = self.initial_state();
        let efficiency = state.efficiency;
        let start_date = state.clock.current_date();
        let mut detector = EventDetector::new(&self.config.narrative);
        let mut snapshots: Vec<PeriodSnapshot> = Vec::with_capacity(total);
        let mut events = Vec::new();

        for _ in 0..total {
            let (next, snapshot) = self.advance(state);
            state = next;
            self.jidoka.check(snapshots.last(), &snapshot)?;
            events.extend(detector.observe(&snapshot));
            let halt = stop(&snapshot);
            snapshots.push(snapshot);
            if halt {
                log::info!("run stopped after {} of {total} periods", snapshots.len());
                break;
            }
        }

        let meta = RunMeta {
            seed: self.config.seed,
            years: self.config.years,
            add_on: self.config.add_on,
            start_date,
            start_jackpot: self.config.start_jackpot,
            starting_balance: self.config.starting_balance,
            efficiency,
            total_periods: total,
            completed_periods: snapshots.len(),
        };
        let output = RunOutput::new(meta, snapshots, events, self.config.narrative.chart_interval);
        log::info!(
            "run finished: {} periods, {} events, {} player jackpot hit(s)",
            output.meta.completed_periods,
            output.events.len(),
            output.summary.player_jackpot_hits
        );
        Ok(output)
    }
}

/// Run-level facts for reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMeta {
    /// Master seed.
    pub seed: u32,
    /// Years configured.
    pub years: u32,
    /// Add-on mode.
    pub add_on: AddOnMode,
    /// First draw date.
    pub start_date: NaiveDate,
    /// Jackpot at the first period.
    pub start_jackpot: f64,
    /// Cash each player started with.
    pub starting_balance: f64,
    /// Market efficiency drawn at run start.
    pub efficiency: f64,
    /// Periods in a full run.
    pub total_periods: usize,
    /// Periods actually resolved.
    pub completed_periods: usize,
}

/// Everything a run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOutput {
    /// Run-level facts.
    pub meta: RunMeta,
    /// One snapshot per resolved period.
    pub snapshots: Vec<PeriodSnapshot>,
    /// Events in emission order.
    pub events: Vec<Event>,
    /// Decimated chart series.
    pub chart_points: Vec<ChartPoint>,
    /// Aggregate results.
    pub summary: RunSummary,
}

impl RunOutput {
    /// Assemble the derived artifacts.
    #[must_use]
    pub fn new(
        meta: RunMeta,
        snapshots: Vec<PeriodSnapshot>,
        events: Vec<Event>,
        chart_interval: usize,
    ) -> Self {
        let chart_points = chart_points(&snapshots, chart_interval);
        let summary = summarize(&snapshots);
        Self {
            meta,
            snapshots,
            events,
            chart_points,
            summary,
        }
    }

    /// BLAKE3 hex digest of the serialized snapshot sequence.
    ///
    /// # Errors
    ///
    /// Returns `SimError::Serialization` if snapshots cannot be serialized.
    pub fn fingerprint(&self) -> SimResult<String> {
        let bytes = serde_json::to_vec(&self.snapshots)
            .map_err(|e| SimError::serialization(e.to_string()))?;
        Ok(blake3::hash(&bytes).to_hex().to_string())
    }

    /// Pretty JSON of the whole output.
    ///
    /// # Errors
    ///
    /// Returns `SimError::Serialization` if serialization fails.
    pub fn to_json(&self) -> SimResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| SimError::serialization(e.to_string()))
    }

    /// One narration line per event.
    #[must_use]
    pub fn narration(&self) -> Vec<String> {
        crate::report::narration(&self.events)
    }

    /// Markdown summary report.
    #[must_use]
    pub fn summary_report(&self) -> String {
        crate::report::summary_report(&self.meta, &self.summary, &self.events)
    }
}
