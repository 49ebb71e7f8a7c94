//! The lottery itself: rules, market economics, draws and ticket strategies.
//!
//! Everything here is a pure function of its inputs plus, where randomness
//! is needed, an explicit [`SimRng`](crate::engine::rng::SimRng).

pub mod draw;
pub mod economics;
pub mod rules;
pub mod strategy;

pub use draw::{Draw, PeriodDraws, Ticket, TicketOutcome};
pub use rules::{AddOnMode, PrizeTier, COMBINATIONS, MAX_JACKPOT, MIN_JACKPOT};
pub use strategy::{
    build_strategy, FilterConfig, FilteredPick, FixedPick, FixedTickets, QuickPick, StrategyKind,
    TicketStrategy,
};
