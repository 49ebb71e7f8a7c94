//! Jidoka (自働化) - stop the run on a broken invariant.
//!
//! After every period the guard inspects the new snapshot, and the one
//! before it, and halts the run at the first defect instead of letting a
//! bad ledger propagate into later periods.
//!
//! # Checks
//!
//! 1. **Jackpot bounds**: pool values stay inside the legal range
//! 2. **Finite ledger**: balances and totals are finite and non-negative
//! 3. **Frozen eliminations**: an eliminated player never changes again
//! 4. **Ranking**: the ranking is a permutation of the roster

use serde::{Deserialize, Serialize};

use crate::engine::ledger::PlayerStatus;
use crate::engine::state::PeriodSnapshot;
use crate::error::{SimError, SimResult};
use crate::lottery::rules::{MAX_JACKPOT, MIN_JACKPOT};

/// A broken run invariant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JidokaViolation {
    /// Jackpot outside `[MIN_JACKPOT, MAX_JACKPOT]`.
    JackpotOutOfBounds {
        /// Which pool value.
        field: String,
        /// Offending value.
        value: f64,
    },
    /// NaN, infinite or negative ledger value.
    InvalidLedgerValue {
        /// Location, e.g. `players[A].balance`.
        location: String,
        /// Offending value.
        value: f64,
    },
    /// An eliminated player's record moved.
    EliminatedPlayerChanged {
        /// Player id.
        player: String,
    },
    /// Ranking ids do not match the roster.
    RankingMismatch {
        /// Ranking as recorded.
        ranking: Vec<String>,
    },
}

impl JidokaViolation {
    /// Short invariant name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::JackpotOutOfBounds { .. } => "jackpot-bounds",
            Self::InvalidLedgerValue { .. } => "ledger-values",
            Self::EliminatedPlayerChanged { .. } => "eliminated-frozen",
            Self::RankingMismatch { .. } => "ranking-permutation",
        }
    }
}

impl From<JidokaViolation> for SimError {
    fn from(v: JidokaViolation) -> Self {
        let detail = match &v {
            JidokaViolation::JackpotOutOfBounds { field, value } => {
                format!("{field} = {value} outside [{MIN_JACKPOT}, {MAX_JACKPOT}]")
            }
            JidokaViolation::InvalidLedgerValue { location, value } => {
                format!("{location} = {value}")
            }
            JidokaViolation::EliminatedPlayerChanged { player } => {
                format!("player {player} changed after elimination")
            }
            JidokaViolation::RankingMismatch { ranking } => {
                format!("ranking {ranking:?} is not a permutation of the roster")
            }
        };
        Self::invariant(v.name(), detail)
    }
}

/// Per-period invariant guard.
///
/// # Example
///
/// ```rust
/// use lotto_logic::prelude::*;
///
/// let engine = SimEngine::new(RunConfig::builder().years(1).build()).unwrap();
/// let (_, snap) = engine.advance(engine.initial_state());
/// assert!(JidokaGuard::new().check(None, &snap).is_ok());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JidokaGuard;

impl JidokaGuard {
    /// Create a guard.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Inspect `snap`, comparing against `previous` where given.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvariantViolation` for the first failed check.
    pub fn check(&self, previous: Option<&PeriodSnapshot>, snap: &PeriodSnapshot) -> SimResult<()> {
        match self.inspect(previous, snap) {
            Some(violation) => Err(violation.into()),
            None => Ok(()),
        }
    }

    /// First violation found, if any.
    #[must_use]
    pub fn inspect(
        &self,
        previous: Option<&PeriodSnapshot>,
        snap: &PeriodSnapshot,
    ) -> Option<JidokaViolation> {
        Self::check_jackpot(snap)
            .or_else(|| Self::check_ledger(snap))
            .or_else(|| previous.and_then(|prev| Self::check_frozen(prev, snap)))
            .or_else(|| Self::check_ranking(snap))
    }

    fn check_jackpot(snap: &PeriodSnapshot) -> Option<JidokaViolation> {
        [("jackpot", snap.jackpot), ("next_jackpot", snap.next_jackpot)]
            .into_iter()
            .find(|(_, value)| !(MIN_JACKPOT..=MAX_JACKPOT).contains(value))
            .map(|(field, value)| JidokaViolation::JackpotOutOfBounds {
                field: field.to_string(),
                value,
            })
    }

    fn check_ledger(snap: &PeriodSnapshot) -> Option<JidokaViolation> {
        for p in &snap.players {
            for (name, value) in [("balance", p.balance), ("spent", p.spent), ("won", p.won)] {
                if !value.is_finite() || value < 0.0 {
                    return Some(JidokaViolation::InvalidLedgerValue {
                        location: format!("players[{}].{name}", p.id),
                        value,
                    });
                }
            }
        }
        None
    }

    fn check_frozen(prev: &PeriodSnapshot, snap: &PeriodSnapshot) -> Option<JidokaViolation> {
        prev.players
            .iter()
            .filter(|p| p.status == PlayerStatus::Eliminated)
            .find(|before| {
                snap.player(&before.id).map_or(true, |now| {
                    now.status != PlayerStatus::Eliminated
                        || now.eliminated_now
                        || !now.tickets.is_empty()
                        || now.balance.to_bits() != before.balance.to_bits()
                        || now.spent.to_bits() != before.spent.to_bits()
                        || now.won.to_bits() != before.won.to_bits()
                        || now.total_jackpot_hits != before.total_jackpot_hits
                })
            })
            .map(|p| JidokaViolation::EliminatedPlayerChanged {
                player: p.id.clone(),
            })
    }

    fn check_ranking(snap: &PeriodSnapshot) -> Option<JidokaViolation> {
        let mut ranked: Vec<&str> = snap.ranking.iter().map(String::as_str).collect();
        let mut roster: Vec<&str> = snap.players.iter().map(|p| p.id.as_str()).collect();
        ranked.sort_unstable();
        roster.sort_unstable();
        (ranked != roster).then(|| JidokaViolation::RankingMismatch {
            ranking: snap.ranking.clone(),
        })
    }
}
