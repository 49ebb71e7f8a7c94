//! Ticket generation strategies.
//!
//! Every strategy answers one question: which `count` tickets does this
//! player hold this period. None of them can change the chance that a
//! given ticket hits the jackpot.

mod filter;
mod fixed;

use serde::{Deserialize, Serialize};

pub use filter::{
    consecutive_pairs, sector_count, tail_pairs, FilterConfig, FilterRule, FilteredPick, SECTORS,
};
pub use fixed::{FixedPick, FixedTickets, FIXED_TICKET_COUNT, FIXED_TICKET_SALT};

use crate::engine::rng::SimRng;
use crate::error::{SimError, SimResult};
use crate::lottery::draw::Ticket;

/// Produces a player's tickets for one period.
pub trait TicketStrategy: std::fmt::Debug {
    /// Which strategy this is.
    fn kind(&self) -> StrategyKind;

    /// Produce exactly `count` tickets, drawing from `rng` only.
    fn generate(&self, count: usize, rng: &mut SimRng) -> Vec<Ticket>;
}

/// Strategy selector used in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// Uniform random tickets.
    #[default]
    QuickPick,
    /// Pattern-filtered tickets.
    Filtered,
    /// Same five tickets every period.
    Fixed,
}

impl StrategyKind {
    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::QuickPick => "Quick Pick",
            Self::Filtered => "Filtered (patterns only)",
            Self::Fixed => "Fixed tickets",
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Independent uniform tickets.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuickPick;

impl TicketStrategy for QuickPick {
    fn kind(&self) -> StrategyKind {
        StrategyKind::QuickPick
    }

    fn generate(&self, count: usize, rng: &mut SimRng) -> Vec<Ticket> {
        (0..count).map(|_| Ticket::random(rng)).collect()
    }
}

/// Build the generator for a strategy selector.
///
/// # Errors
///
/// Returns `SimError::Config` if `kind` is `Fixed` and no tickets are given.
pub fn build_strategy(
    kind: StrategyKind,
    filter: &FilterConfig,
    fixed: Option<&FixedTickets>,
) -> SimResult<Box<dyn TicketStrategy + Send + Sync>> {
    Ok(match kind {
        StrategyKind::QuickPick => Box::new(QuickPick),
        StrategyKind::Filtered => Box::new(FilteredPick::new(filter.clamped())),
        StrategyKind::Fixed => {
            let tickets = fixed
                .copied()
                .ok_or_else(|| SimError::config("fixed strategy requires five tickets"))?;
            Box::new(FixedPick::new(tickets))
        }
    })
}
