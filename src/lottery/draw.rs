//! Tickets, draws and match resolution.
//!
//! A [`Ticket`] keeps its white balls sorted so matching is a linear
//! two-pointer merge. Draws have the same shape as tickets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::rules::{AddOnMode, PrizeTier, POWERBALL_MAX, POWER_PLAY_WHEEL, WHITE_MAX, WHITE_PICK};
use crate::engine::rng::SimRng;
use crate::error::{SimError, SimResult};

/// Five distinct ascending whites in `1..=69` plus a powerball in `1..=26`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ticket {
    white: [u8; WHITE_PICK],
    powerball: u8,
}

/// A drawn result. Same shape and invariants as a ticket.
pub type Draw = Ticket;

impl Ticket {
    /// Build a ticket, sorting the whites.
    ///
    /// # Errors
    ///
    /// Returns `SimError::Config` if a white is out of range or repeated,
    /// or if the powerball is out of range.
    pub fn new(mut white: [u8; WHITE_PICK], powerball: u8) -> SimResult<Self> {
        white.sort_unstable();
        if let Some(bad) = white.iter().find(|&&w| w == 0 || w > WHITE_MAX) {
            return Err(SimError::config(format!(
                "white number {bad} outside 1..={WHITE_MAX}"
            )));
        }
        if let Some(pair) = white.windows(2).find(|w| w[0] == w[1]) {
            return Err(SimError::config(format!("duplicate white number {}", pair[0])));
        }
        if powerball == 0 || powerball > POWERBALL_MAX {
            return Err(SimError::config(format!(
                "powerball {powerball} outside 1..={POWERBALL_MAX}"
            )));
        }
        Ok(Self { white, powerball })
    }

    /// Uniform random ticket: 5 distinct whites, then one powerball.
    pub fn random(rng: &mut SimRng) -> Self {
        let white = random_whites(rng);
        let powerball = random_powerball(rng);
        Self { white, powerball }
    }

    /// Assemble a ticket from whites already produced by [`random_whites`].
    pub(crate) const fn from_sorted(white: [u8; WHITE_PICK], powerball: u8) -> Self {
        Self { white, powerball }
    }

    /// The white balls, ascending.
    #[must_use]
    pub const fn white(&self) -> &[u8; WHITE_PICK] {
        &self.white
    }

    /// The powerball.
    #[must_use]
    pub const fn powerball(&self) -> u8 {
        self.powerball
    }

    /// Count shared whites with a sorted two-pointer merge.
    #[must_use]
    pub fn white_matches(&self, draw: &Draw) -> usize {
        let (a, b) = (&self.white, &draw.white);
        let (mut i, mut j, mut count) = (0, 0, 0);
        while i < a.len() && j < b.len() {
            match a[i].cmp(&b[j]) {
                std::cmp::Ordering::Equal => {
                    count += 1;
                    i += 1;
                    j += 1;
                }
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
            }
        }
        count
    }

    /// Classify this ticket against a draw.
    #[must_use]
    pub fn classify(&self, draw: &Draw) -> Option<PrizeTier> {
        PrizeTier::classify(self.white_matches(draw), self.powerball == draw.powerball)
    }
}

/// Five distinct whites, ascending.
pub(crate) fn random_whites(rng: &mut SimRng) -> [u8; WHITE_PICK] {
    let picked = rng.pick_k_distinct(WHITE_MAX, WHITE_PICK);
    let mut white = [0; WHITE_PICK];
    white.copy_from_slice(&picked);
    white
}

pub(crate) fn random_powerball(rng: &mut SimRng) -> u8 {
    1 + rng.gen_index(usize::from(POWERBALL_MAX)) as u8
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e] = self.white;
        write!(f, "{a} {b} {c} {d} {e} | {}", self.powerball)
    }
}

impl FromStr for Ticket {
    type Err = SimError;

    /// Parse `w w w w w | pb`.
    fn from_str(s: &str) -> SimResult<Self> {
        let (whites, pb) = s
            .split_once('|')
            .ok_or_else(|| SimError::config("expected `w w w w w | pb`"))?;
        if pb.contains('|') {
            return Err(SimError::config("more than one `|` separator"));
        }
        let numbers = whites
            .split_whitespace()
            .map(|tok| {
                tok.parse::<u8>()
                    .map_err(|_| SimError::config(format!("`{tok}` is not a ball number")))
            })
            .collect::<SimResult<Vec<u8>>>()?;
        let white: [u8; WHITE_PICK] = numbers.as_slice().try_into().map_err(|_| {
            SimError::config(format!(
                "expected {WHITE_PICK} white numbers, found {}",
                numbers.len()
            ))
        })?;
        let pb = pb.trim();
        let powerball = pb
            .parse::<u8>()
            .map_err(|_| SimError::config(format!("`{pb}` is not a powerball number")))?;
        Self::new(white, powerball)
    }
}

/// Everything drawn for one period that tickets are settled against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodDraws {
    /// Main result.
    pub main: Draw,
    /// Second independent result (Double Play only).
    pub double_play: Option<Draw>,
    /// Power Play multiplier (1 when Power Play is off).
    pub multiplier: u32,
}

impl PeriodDraws {
    /// Draw the period's results in fixed order: main, double play, multiplier.
    pub fn draw(add_on: AddOnMode, rng: &mut SimRng) -> Self {
        let main = Ticket::random(rng);
        let double_play = (add_on == AddOnMode::DoublePlay).then(|| Ticket::random(rng));
        let multiplier = if add_on == AddOnMode::PowerPlay {
            rng.pick_weighted(&POWER_PLAY_WHEEL).unwrap_or(1)
        } else {
            1
        };
        Self {
            main,
            double_play,
            multiplier,
        }
    }

    /// Settle one ticket. Jackpot-tier hits are counted, never paid here.
    #[must_use]
    pub fn settle(&self, ticket: &Ticket, add_on: AddOnMode) -> TicketOutcome {
        let main_tier = ticket.classify(&self.main);
        let mut outcome = TicketOutcome {
            main_tier,
            ..TicketOutcome::default()
        };

        match main_tier {
            Some(PrizeTier::Jackpot) => outcome.jackpot_hits = 1,
            Some(tier) => {
                let prize = if add_on == AddOnMode::PowerPlay {
                    tier.power_play_prize(self.multiplier)
                } else {
                    tier.base_prize()
                };
                outcome.cash += prize.unwrap_or(0.0);
            }
            None => {}
        }

        if let Some(second) = &self.double_play {
            outcome.double_play_tier = ticket.classify(second);
            if let Some(tier) = outcome.double_play_tier {
                outcome.cash += tier.double_play_prize();
            }
        }
        outcome
    }
}

/// Result of settling one ticket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TicketOutcome {
    /// Tier on the main draw.
    pub main_tier: Option<PrizeTier>,
    /// Tier on the Double Play draw.
    pub double_play_tier: Option<PrizeTier>,
    /// Fixed-dollar winnings, credited immediately.
    pub cash: f64,
    /// 1 if the ticket hit the shared jackpot tier.
    pub jackpot_hits: u32,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn ticket(s: &str) -> Ticket {
        s.parse().expect("valid ticket")
    }

    #[test]
    fn test_new_sorts_whites() {
        let t = Ticket::new([65, 3, 42, 11, 19], 7).unwrap();
        assert_eq!(t.white(), &[3, 11, 19, 42, 65]);
        assert_eq!(t.powerball(), 7);
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        assert!(Ticket::new([0, 3, 42, 11, 19], 7).is_err());
        assert!(Ticket::new([70, 3, 42, 11, 19], 7).is_err());
        assert!(Ticket::new([1, 3, 42, 11, 19], 0).is_err());
        assert!(Ticket::new([1, 3, 42, 11, 19], 27).is_err());
    }

    #[test]
    fn test_new_rejects_duplicates() {
        let err = Ticket::new([3, 3, 42, 11, 19], 7).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_parse_and_display() {
        let t = ticket("3 11 19 42 65 | 7");
        assert_eq!(t.to_string(), "3 11 19 42 65 | 7");
        let spaced = ticket("  65 42 19 11 3|7 ");
        assert_eq!(t, spaced);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!("3 11 19 42 65".parse::<Ticket>().is_err());
        assert!("3 11 19 42 | 7".parse::<Ticket>().is_err());
        assert!("3 11 19 42 65 66 | 7".parse::<Ticket>().is_err());
        assert!("3 11 x 42 65 | 7".parse::<Ticket>().is_err());
        assert!("3 11 19 42 65 | 7 | 8".parse::<Ticket>().is_err());
        assert!("3 11 19 42 65 | ".parse::<Ticket>().is_err());
    }

    #[test]
    fn test_white_matches_two_pointer() {
        let a = ticket("1 2 3 4 5 | 1");
        let b = ticket("3 4 5 6 7 | 2");
        assert_eq!(a.white_matches(&b), 3);
        assert_eq!(b.white_matches(&a), 3);
        assert_eq!(a.white_matches(&a), 5);
        let c = ticket("60 61 62 63 64 | 2");
        assert_eq!(a.white_matches(&c), 0);
    }

    #[test]
    fn test_random_ticket_is_valid() {
        let mut rng = SimRng::new(99);
        for _ in 0..500 {
            let t = Ticket::random(&mut rng);
            assert!(Ticket::new(*t.white(), t.powerball()).is_ok());
        }
    }

    fn draws(main: &str) -> PeriodDraws {
        PeriodDraws {
            main: ticket(main),
            double_play: None,
            multiplier: 1,
        }
    }

    #[test]
    fn test_settle_jackpot_excluded_from_cash() {
        let d = draws("3 11 19 42 65 | 7");
        let outcome = d.settle(&ticket("3 11 19 42 65 | 7"), AddOnMode::None);
        assert_eq!(outcome.main_tier, Some(PrizeTier::Jackpot));
        assert_eq!(outcome.jackpot_hits, 1);
        assert!(outcome.cash.abs() < f64::EPSILON);
    }

    #[test]
    fn test_settle_base_prize() {
        let d = draws("3 11 19 42 65 | 7");
        let outcome = d.settle(&ticket("3 11 19 42 66 | 7"), AddOnMode::None);
        assert_eq!(outcome.main_tier, Some(PrizeTier::Match4Powerball));
        assert!((outcome.cash - 50_000.0).abs() < f64::EPSILON);
        assert_eq!(outcome.jackpot_hits, 0);
    }

    #[test]
    fn test_settle_power_play() {
        let mut d = draws("3 11 19 42 65 | 7");
        d.multiplier = 4;
        let four_pb = d.settle(&ticket("3 11 19 42 66 | 7"), AddOnMode::PowerPlay);
        assert!((four_pb.cash - 200_000.0).abs() < f64::EPSILON);
        let five = d.settle(&ticket("3 11 19 42 65 | 8"), AddOnMode::PowerPlay);
        assert!((five.cash - 2_000_000.0).abs() < f64::EPSILON);
        let jackpot = d.settle(&ticket("3 11 19 42 65 | 7"), AddOnMode::PowerPlay);
        assert!(jackpot.cash.abs() < f64::EPSILON);
    }

    #[test]
    fn test_settle_double_play_adds_second_table() {
        let mut d = draws("3 11 19 42 65 | 7");
        d.double_play = Some(ticket("1 2 3 4 5 | 9"));
        // main: 1+PB pays 4; double play: 1 white without PB pays nothing
        let t = ticket("3 20 30 40 50 | 7");
        let outcome = d.settle(&t, AddOnMode::DoublePlay);
        assert!((outcome.cash - 4.0).abs() < f64::EPSILON);
        // second draw 0+PB pays 7
        d.double_play = Some(ticket("1 2 4 5 6 | 7"));
        let outcome = d.settle(&t, AddOnMode::DoublePlay);
        assert!((outcome.cash - 11.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_period_draws_respect_mode() {
        let mut rng = SimRng::new(5);
        let none = PeriodDraws::draw(AddOnMode::None, &mut rng);
        assert!(none.double_play.is_none());
        assert_eq!(none.multiplier, 1);

        let dp = PeriodDraws::draw(AddOnMode::DoublePlay, &mut rng);
        assert!(dp.double_play.is_some());

        for _ in 0..100 {
            let pp = PeriodDraws::draw(AddOnMode::PowerPlay, &mut rng);
            assert!((2..=5).contains(&pp.multiplier));
        }
    }
}
