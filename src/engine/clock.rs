//! Draw calendar.
//!
//! Draws happen three times a week, on Monday, Wednesday and Saturday.
//! The clock walks that cycle one period at a time:
//! - Saturday to Monday: +2 days
//! - Monday to Wednesday: +2 days
//! - Wednesday to Saturday: +3 days

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Draws per week.
pub const DRAWS_PER_WEEK: usize = 3;
/// Weeks per simulated year.
pub const WEEKS_PER_YEAR: usize = 52;
/// Draw periods per simulated year.
pub const PERIODS_PER_YEAR: usize = DRAWS_PER_WEEK * WEEKS_PER_YEAR;

/// Whether draws happen on `day`.
#[must_use]
pub const fn is_draw_day(day: Weekday) -> bool {
    matches!(day, Weekday::Mon | Weekday::Wed | Weekday::Sat)
}

fn add_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX)
}

/// First draw day on or after `date`.
#[must_use]
pub fn align_to_draw_day(date: NaiveDate) -> NaiveDate {
    let mut aligned = date;
    while !is_draw_day(aligned.weekday()) && aligned < NaiveDate::MAX {
        aligned = add_days(aligned, 1);
    }
    aligned
}

/// Draw day following `date`, which must itself be a draw day.
#[must_use]
pub fn next_draw_date(date: NaiveDate) -> NaiveDate {
    match date.weekday() {
        Weekday::Wed => add_days(date, 3),
        Weekday::Mon | Weekday::Sat => add_days(date, 2),
        _ => align_to_draw_day(date),
    }
}

/// Label for a period index: `Y<year>-W<week>-D<draw>`, all 1-based.
///
/// ```rust
/// use lotto_logic::engine::clock::draw_id;
///
/// assert_eq!(draw_id(0), "Y1-W1-D1");
/// assert_eq!(draw_id(156), "Y2-W1-D1");
/// ```
#[must_use]
pub fn draw_id(index: usize) -> String {
    let year = index / PERIODS_PER_YEAR + 1;
    let within = index % PERIODS_PER_YEAR;
    let week = within / DRAWS_PER_WEEK + 1;
    let draw = within % DRAWS_PER_WEEK + 1;
    format!("Y{year}-W{week}-D{draw}")
}

/// Calendar position of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawClock {
    date: NaiveDate,
    period: usize,
}

impl DrawClock {
    /// Start at the first draw day on or after `start`.
    #[must_use]
    pub fn new(start: NaiveDate) -> Self {
        Self {
            date: align_to_draw_day(start),
            period: 0,
        }
    }

    /// Date of the current period.
    #[must_use]
    pub const fn current_date(&self) -> NaiveDate {
        self.date
    }

    /// Weekday of the current period.
    #[must_use]
    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }

    /// Zero-based index of the current period.
    #[must_use]
    pub const fn period(&self) -> usize {
        self.period
    }

    /// Label of the current period.
    #[must_use]
    pub fn draw_id(&self) -> String {
        draw_id(self.period)
    }

    /// Move to the next draw. Returns the new date.
    pub fn tick(&mut self) -> NaiveDate {
        self.date = next_draw_date(self.date);
        self.period += 1;
        self.date
    }
}
