//! Powerball rules, prize tables and the Power Play wheel.
//!
//! All amounts are cash dollars. The jackpot tier never appears in a
//! fixed-dollar table for the base game: it is paid out of the shared pool
//! by the run loop.

use serde::{Deserialize, Serialize};

/// Highest white-ball number.
pub const WHITE_MAX: u8 = 69;
/// White balls per ticket.
pub const WHITE_PICK: usize = 5;
/// Highest powerball number.
pub const POWERBALL_MAX: u8 = 26;

/// Number of distinct tickets: C(69, 5) * 26.
pub const COMBINATIONS: u64 = binomial(WHITE_MAX as u64, WHITE_PICK as u64) * POWERBALL_MAX as u64;

/// Base ticket price.
pub const TICKET_PRICE: f64 = 2.0;
/// Extra cost per ticket for either add-on.
pub const ADD_ON_PRICE: f64 = 1.0;

/// Jackpot floor (cash value).
pub const MIN_JACKPOT: f64 = 20_000_000.0;
/// Jackpot ceiling (cash value).
pub const MAX_JACKPOT: f64 = 2_000_000_000.0;
/// Share of base ticket revenue contributed to the jackpot pool.
pub const JACKPOT_CONTRIBUTION: f64 = 0.340_066;

/// Fixed prize for 5 whites without powerball under Power Play.
pub const POWER_PLAY_MATCH_5: f64 = 2_000_000.0;

/// Power Play multiplier wheel as (multiplier, weight). No 10x slot.
pub const POWER_PLAY_WHEEL: [(u32, u32); 4] = [(2, 24), (3, 13), (4, 3), (5, 2)];

const fn binomial(n: u64, k: u64) -> u64 {
    let mut result = 1;
    let mut i = 0;
    while i < k {
        result = result * (n - i) / (i + 1);
        i += 1;
    }
    result
}

/// Optional per-ticket add-on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AddOnMode {
    /// Base game only.
    #[default]
    None,
    /// Per-period multiplier on non-jackpot prizes.
    PowerPlay,
    /// Second independent draw with its own prize table.
    DoublePlay,
}

impl AddOnMode {
    /// Cost of one ticket including the add-on.
    #[must_use]
    pub fn ticket_cost(self) -> f64 {
        match self {
            Self::None => TICKET_PRICE,
            Self::PowerPlay | Self::DoublePlay => TICKET_PRICE + ADD_ON_PRICE,
        }
    }

    /// Short label used in reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::PowerPlay => "POWER PLAY",
            Self::DoublePlay => "DOUBLE PLAY",
        }
    }
}

impl std::fmt::Display for AddOnMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A winning match outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PrizeTier {
    /// 5 whites + powerball.
    Jackpot,
    /// 5 whites.
    Match5,
    /// 4 whites + powerball.
    Match4Powerball,
    /// 4 whites.
    Match4,
    /// 3 whites + powerball.
    Match3Powerball,
    /// 3 whites.
    Match3,
    /// 2 whites + powerball.
    Match2Powerball,
    /// 1 white + powerball.
    Match1Powerball,
    /// Powerball only.
    PowerballOnly,
}

impl PrizeTier {
    /// All tiers, best first.
    pub const ALL: [Self; 9] = [
        Self::Jackpot,
        Self::Match5,
        Self::Match4Powerball,
        Self::Match4,
        Self::Match3Powerball,
        Self::Match3,
        Self::Match2Powerball,
        Self::Match1Powerball,
        Self::PowerballOnly,
    ];

    /// Map a (white matches, powerball match) pair to a tier.
    #[must_use]
    pub const fn classify(white_matches: usize, powerball: bool) -> Option<Self> {
        match (white_matches, powerball) {
            (5, true) => Some(Self::Jackpot),
            (5, false) => Some(Self::Match5),
            (4, true) => Some(Self::Match4Powerball),
            (4, false) => Some(Self::Match4),
            (3, true) => Some(Self::Match3Powerball),
            (3, false) => Some(Self::Match3),
            (2, true) => Some(Self::Match2Powerball),
            (1, true) => Some(Self::Match1Powerball),
            (0, true) => Some(Self::PowerballOnly),
            _ => None,
        }
    }

    /// Whether this is the shared-pool tier.
    #[must_use]
    pub const fn is_jackpot(self) -> bool {
        matches!(self, Self::Jackpot)
    }

    /// Fixed prize in the base game. The jackpot tier has none.
    #[must_use]
    pub const fn base_prize(self) -> Option<f64> {
        match self {
            Self::Jackpot => None,
            Self::Match5 => Some(1_000_000.0),
            Self::Match4Powerball => Some(50_000.0),
            Self::Match4 | Self::Match3Powerball => Some(100.0),
            Self::Match3 | Self::Match2Powerball => Some(7.0),
            Self::Match1Powerball | Self::PowerballOnly => Some(4.0),
        }
    }

    /// Base prize under Power Play with the period's multiplier.
    ///
    /// 5 whites without powerball pays a flat $2M instead of being multiplied.
    #[must_use]
    pub fn power_play_prize(self, multiplier: u32) -> Option<f64> {
        match self {
            Self::Jackpot => None,
            Self::Match5 => Some(POWER_PLAY_MATCH_5),
            other => other.base_prize().map(|p| p * f64::from(multiplier)),
        }
    }

    /// Prize on the Double Play draw. Its top prize is fixed, not pooled.
    #[must_use]
    pub const fn double_play_prize(self) -> f64 {
        match self {
            Self::Jackpot => 10_000_000.0,
            Self::Match5 => 500_000.0,
            Self::Match4Powerball => 50_000.0,
            Self::Match4 | Self::Match3Powerball => 500.0,
            Self::Match3 | Self::Match2Powerball => 20.0,
            Self::Match1Powerball => 10.0,
            Self::PowerballOnly => 7.0,
        }
    }

    /// Short label such as `5+PB`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Jackpot => "5+PB",
            Self::Match5 => "5+0",
            Self::Match4Powerball => "4+PB",
            Self::Match4 => "4+0",
            Self::Match3Powerball => "3+PB",
            Self::Match3 => "3+0",
            Self::Match2Powerball => "2+PB",
            Self::Match1Powerball => "1+PB",
            Self::PowerballOnly => "0+PB",
        }
    }
}

/// Clamp a jackpot value into the legal cash range.
#[must_use]
pub fn clamp_jackpot(value: f64) -> f64 {
    if value.is_nan() {
        return MIN_JACKPOT;
    }
    value.clamp(MIN_JACKPOT, MAX_JACKPOT)
}
