//! Run state and per-period records.
//!
//! [`RunState`] is the only mutable state in a run. It is moved into each
//! period advance and handed back afterwards, together with an immutable
//! [`PeriodSnapshot`] describing what happened.

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::engine::clock::DrawClock;
use crate::engine::ledger::{JackpotState, Player, PlayerStatus};
use crate::engine::rng::SimRng;
use crate::lottery::draw::{PeriodDraws, Ticket};
use crate::lottery::rules::AddOnMode;
use crate::lottery::strategy::StrategyKind;

/// Mutable state threaded through a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    pub(crate) rng: SimRng,
    pub(crate) clock: DrawClock,
    pub(crate) jackpot: JackpotState,
    pub(crate) players: Vec<Player>,
    pub(crate) efficiency: f64,
    pub(crate) last_jackpot_period: Option<usize>,
}

impl RunState {
    /// The run's random stream.
    #[must_use]
    pub const fn rng(&self) -> &SimRng {
        &self.rng
    }

    /// Calendar position of the next period.
    #[must_use]
    pub const fn clock(&self) -> &DrawClock {
        &self.clock
    }

    /// Jackpot at stake in the next period.
    #[must_use]
    pub const fn jackpot(&self) -> JackpotState {
        self.jackpot
    }

    /// Players in roster order.
    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Share of market sales that count toward the jackpot odds.
    #[must_use]
    pub const fn efficiency(&self) -> f64 {
        self.efficiency
    }

    /// Next period index.
    #[must_use]
    pub const fn period(&self) -> usize {
        self.clock.period()
    }
}

/// One player's slice of a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerPeriod {
    /// Identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Ticket strategy.
    pub strategy: StrategyKind,
    /// Tickets bought this period.
    pub tickets: Vec<Ticket>,
    /// Ticket spend this period.
    pub cost: f64,
    /// Fixed-dollar prizes this period.
    pub prize_cash: f64,
    /// Jackpot-tier tickets this period.
    pub jackpot_hits: u32,
    /// Jackpot cash credited this period.
    pub jackpot_cash: f64,
    /// Balance after the period.
    pub balance: f64,
    /// Cumulative spend after the period.
    pub spent: f64,
    /// Cumulative winnings after the period.
    pub won: f64,
    /// Cumulative jackpot-tier tickets after the period.
    pub total_jackpot_hits: u32,
    /// Status after the period.
    pub status: PlayerStatus,
    /// Eliminated during this period.
    pub eliminated_now: bool,
}

impl PlayerPeriod {
    pub(crate) fn idle(player: &Player) -> Self {
        Self {
            id: player.id.clone(),
            name: player.name.clone(),
            strategy: player.strategy,
            tickets: Vec::new(),
            cost: 0.0,
            prize_cash: 0.0,
            jackpot_hits: 0,
            jackpot_cash: 0.0,
            balance: player.balance,
            spent: player.spent,
            won: player.won,
            total_jackpot_hits: player.jackpot_hits,
            status: player.status,
            eliminated_now: false,
        }
    }

    pub(crate) fn sync_totals(&mut self, player: &Player) {
        self.balance = player.balance;
        self.spent = player.spent;
        self.won = player.won;
        self.total_jackpot_hits = player.jackpot_hits;
        self.status = player.status;
    }

    /// Whether the player won anything this period.
    #[must_use]
    pub fn won_anything(&self) -> bool {
        self.prize_cash > 0.0 || self.jackpot_hits > 0
    }
}

/// Immutable record of one draw period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSnapshot {
    /// Zero-based period index.
    pub index: usize,
    /// `Y<year>-W<week>-D<draw>` label.
    pub draw_id: String,
    /// Calendar date.
    pub date: NaiveDate,
    /// Draw weekday.
    pub weekday: Weekday,
    /// Add-on mode of the run.
    pub add_on: AddOnMode,
    /// Jackpot at stake this period.
    pub jackpot: f64,
    /// Jackpot at stake next period.
    pub next_jackpot: f64,
    /// Market tickets sold.
    pub tickets_sold: u64,
    /// Sales counted toward the jackpot odds.
    pub effective_tickets: f64,
    /// Expected market jackpot winners.
    pub lambda: f64,
    /// Chance of at least one market winner.
    pub hit_probability: f64,
    /// Market jackpot winners.
    pub market_winners: u64,
    /// Market winners plus player jackpot-tier tickets.
    pub total_winners: u64,
    /// Cash per winning ticket when the jackpot was hit.
    pub jackpot_share: Option<f64>,
    /// Results drawn this period.
    pub draws: PeriodDraws,
    /// Players in roster order.
    pub players: Vec<PlayerPeriod>,
    /// Player ids by balance, highest first.
    pub ranking: Vec<String>,
    /// Most recent period with a jackpot winner, this one included.
    pub last_jackpot_period: Option<usize>,
}

impl PeriodSnapshot {
    /// Whether anyone hit the jackpot.
    #[must_use]
    pub const fn jackpot_hit(&self) -> bool {
        self.total_winners > 0
    }

    /// Jackpot-tier tickets held by players.
    #[must_use]
    pub fn player_jackpot_hits(&self) -> u32 {
        self.players.iter().map(|p| p.jackpot_hits).sum()
    }

    /// First-ranked player id.
    #[must_use]
    pub fn leader(&self) -> Option<&str> {
        self.ranking.first().map(String::as_str)
    }

    /// Player record by id.
    #[must_use]
    pub fn player(&self, id: &str) -> Option<&PlayerPeriod> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Whether any prize at all was paid this period.
    #[must_use]
    pub fn any_prize(&self) -> bool {
        self.market_winners > 0 || self.players.iter().any(PlayerPeriod::won_anything)
    }
}
