//! # lotto-logic
//!
//! Reproducible draw-by-draw simulation of a Powerball-style lottery market.
//!
//! A run covers up to a century of Monday/Wednesday/Saturday draws:
//! - A shared jackpot grown by market sales and split across every winner
//! - A stochastic market of outside ticket buyers
//! - Up to five players with distinct ticket strategies and cash bankrolls
//! - Narrative events derived from the per-period snapshots
//!
//! The same seed and configuration always produce the same run, and no
//! strategy changes the per-ticket jackpot odds.
//!
//! ## Example
//!
//! ```rust
//! use lotto_logic::prelude::*;
//!
//! let config = RunConfig::builder()
//!     .seed(42)
//!     .years(2)
//!     .add_on(AddOnMode::PowerPlay)
//!     .build();
//! let output = SimEngine::new(config).unwrap().run().unwrap();
//! assert_eq!(output.snapshots.len(), 2 * 156);
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::suboptimal_flops,
    clippy::imprecise_flops,
    clippy::too_many_lines,
    clippy::missing_const_for_fn,  // Many functions can't be const in stable Rust
)]

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod lottery;
pub mod report;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{PlayerConfig, RunConfig, RunConfigBuilder};
    pub use crate::engine::events::{Event, EventCategory, NarrativeConfig};
    pub use crate::engine::jidoka::{JidokaGuard, JidokaViolation};
    pub use crate::engine::rng::SimRng;
    pub use crate::engine::{PeriodSnapshot, RunOutput, RunState, SimEngine};
    pub use crate::error::{SimError, SimResult};
    pub use crate::lottery::draw::{Draw, Ticket};
    pub use crate::lottery::rules::{AddOnMode, PrizeTier};
    pub use crate::lottery::strategy::{FilterConfig, FixedTickets, StrategyKind, TicketStrategy};
    pub use crate::report::{ChartPoint, RunSummary};
}

/// Re-export for public API
pub use error::{SimError, SimResult};
