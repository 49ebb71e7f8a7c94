//! Fixed-ticket replay.
//!
//! One player per run may replay the same five tickets every period. The
//! ticket set is parsed all-or-nothing: any bad line, or any count other
//! than five, rejects the whole text.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{StrategyKind, TicketStrategy};
use crate::engine::rng::SimRng;
use crate::error::{SimError, SimResult};
use crate::lottery::draw::Ticket;

/// Tickets in a fixed set.
pub const FIXED_TICKET_COUNT: usize = 5;

/// Salt XORed into the run seed for the default fixed tickets, so they stay
/// put when the main stream is consumed differently.
pub const FIXED_TICKET_SALT: u64 = 0xA5A5_F00D;

/// Exactly five validated tickets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedTickets([Ticket; FIXED_TICKET_COUNT]);

impl FixedTickets {
    /// Wrap five tickets.
    #[must_use]
    pub const fn new(tickets: [Ticket; FIXED_TICKET_COUNT]) -> Self {
        Self(tickets)
    }

    /// Parse one ticket per non-empty line (`w w w w w | pb`).
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidTicket` for the first bad line and
    /// `SimError::TicketCount` when there are not exactly five lines.
    ///
    /// # Example
    ///
    /// ```rust
    /// use lotto_logic::lottery::strategy::FixedTickets;
    ///
    /// let text = "3 11 19 42 65 | 7\n".repeat(5);
    /// let fixed = FixedTickets::parse(&text).unwrap();
    /// assert_eq!(fixed.tickets().len(), 5);
    /// ```
    pub fn parse(text: &str) -> SimResult<Self> {
        let tickets = text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| {
                line.parse::<Ticket>().map_err(|e| {
                    let reason = match e {
                        SimError::Config { message } => message,
                        other => other.to_string(),
                    };
                    SimError::invalid_ticket(i + 1, reason)
                })
            })
            .collect::<SimResult<Vec<Ticket>>>()?;

        let found = tickets.len();
        let tickets: [Ticket; FIXED_TICKET_COUNT] = tickets
            .try_into()
            .map_err(|_| SimError::TicketCount { found })?;
        Ok(Self(tickets))
    }

    /// Default set drawn from the stream derived with [`FIXED_TICKET_SALT`].
    #[must_use]
    pub fn from_seed(seed: u32) -> Self {
        let mut rng = SimRng::new(u64::from(seed)).derive(FIXED_TICKET_SALT);
        Self(std::array::from_fn(|_| Ticket::random(&mut rng)))
    }

    /// The five tickets.
    #[must_use]
    pub const fn tickets(&self) -> &[Ticket; FIXED_TICKET_COUNT] {
        &self.0
    }
}

impl FromStr for FixedTickets {
    type Err = SimError;

    fn from_str(s: &str) -> SimResult<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for FixedTickets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, ticket) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{ticket}")?;
        }
        Ok(())
    }
}

/// Replays the first `count` fixed tickets every period.
#[derive(Debug, Clone)]
pub struct FixedPick {
    tickets: FixedTickets,
}

impl FixedPick {
    /// Create the strategy.
    #[must_use]
    pub const fn new(tickets: FixedTickets) -> Self {
        Self { tickets }
    }
}

impl TicketStrategy for FixedPick {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Fixed
    }

    fn generate(&self, count: usize, _rng: &mut SimRng) -> Vec<Ticket> {
        self.tickets.tickets().iter().take(count).copied().collect()
    }
}
