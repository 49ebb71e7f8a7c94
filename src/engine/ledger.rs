//! Player bankrolls and the shared jackpot pool.

use serde::{Deserialize, Serialize};

use crate::config::PlayerConfig;
use crate::lottery::economics::grow_jackpot;
use crate::lottery::rules::{clamp_jackpot, MIN_JACKPOT};
use crate::lottery::strategy::StrategyKind;

/// Most tickets a player buys in one period.
pub const MAX_TICKETS_PER_PERIOD: usize = 5;

/// Player lifecycle. `Eliminated` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlayerStatus {
    /// Still buying tickets.
    #[default]
    Active,
    /// Could not afford a ticket; frozen for the rest of the run.
    Eliminated,
}

/// One player's bankroll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Ticket strategy.
    pub strategy: StrategyKind,
    /// Cash on hand.
    pub balance: f64,
    /// Cumulative ticket spend.
    pub spent: f64,
    /// Cumulative winnings, fixed prizes and jackpot shares.
    pub won: f64,
    /// Jackpot-tier tickets held over the run.
    pub jackpot_hits: u32,
    /// Lifecycle state.
    pub status: PlayerStatus,
}

impl Player {
    /// Fresh player with `balance` cash.
    #[must_use]
    pub fn new(config: &PlayerConfig, balance: f64) -> Self {
        Self {
            id: config.id.clone(),
            name: config.display_name(),
            strategy: config.strategy,
            balance,
            spent: 0.0,
            won: 0.0,
            jackpot_hits: 0,
            status: PlayerStatus::Active,
        }
    }

    /// Whether the player still buys tickets.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == PlayerStatus::Active
    }

    /// Tickets the player can buy at `cost` each, capped at five.
    #[must_use]
    pub fn affordable_tickets(&self, cost: f64) -> usize {
        if !self.is_active() || cost <= 0.0 || !self.balance.is_finite() {
            return 0;
        }
        let whole = (self.balance / cost).floor();
        if whole >= MAX_TICKETS_PER_PERIOD as f64 {
            MAX_TICKETS_PER_PERIOD
        } else if whole > 0.0 {
            whole as usize
        } else {
            0
        }
    }

    /// Pay for tickets.
    pub fn debit(&mut self, amount: f64) {
        self.balance -= amount;
        self.spent += amount;
    }

    /// Receive winnings.
    pub fn credit(&mut self, amount: f64) {
        self.balance += amount;
        self.won += amount;
    }

    /// Freeze the player.
    pub fn eliminate(&mut self) {
        self.status = PlayerStatus::Eliminated;
    }
}

/// Player ids by balance, highest first. Ties keep roster order.
#[must_use]
pub fn ranking(players: &[Player]) -> Vec<String> {
    let mut order: Vec<&Player> = players.iter().collect();
    order.sort_by(|a, b| b.balance.total_cmp(&a.balance));
    order.into_iter().map(|p| p.id.clone()).collect()
}

/// How a period's jackpot was split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JackpotSplit {
    /// Market winners plus player jackpot-tier tickets.
    pub total_winners: u64,
    /// Cash per winning ticket.
    pub share: f64,
    /// Credit per player, in roster order.
    pub payouts: Vec<f64>,
}

/// Split `jackpot` evenly across every winning ticket.
///
/// Returns `None` when nobody won.
#[must_use]
pub fn split_jackpot(jackpot: f64, market_winners: u64, player_hits: &[u32]) -> Option<JackpotSplit> {
    let player_total: u64 = player_hits.iter().map(|&h| u64::from(h)).sum();
    let total_winners = market_winners + player_total;
    if total_winners == 0 {
        return None;
    }
    let share = jackpot / total_winners as f64;
    let payouts = player_hits.iter().map(|&h| share * f64::from(h)).collect();
    Some(JackpotSplit {
        total_winners,
        share,
        payouts,
    })
}

/// The shared jackpot pool, always within the legal bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JackpotState {
    value: f64,
}

impl Default for JackpotState {
    fn default() -> Self {
        Self { value: MIN_JACKPOT }
    }
}

impl JackpotState {
    /// Pool starting at `value`, clamped.
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self {
            value: clamp_jackpot(value),
        }
    }

    /// Current cash value.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }

    /// Back to the floor after a hit.
    pub fn reset(&mut self) {
        self.value = MIN_JACKPOT;
    }

    /// Roll over with this period's sales.
    pub fn grow(&mut self, tickets_sold: u64) {
        self.value = grow_jackpot(self.value, tickets_sold);
    }
}
