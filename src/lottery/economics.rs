//! Market economics: ticket sales and jackpot growth.
//!
//! # Governing Equations
//!
//! ```text
//! sales(J, day) = alpha * J_m^beta(J) * day_factor(day) * exp(z*sigma - sigma^2/2)
//! J' = clamp(J + sales * $2 * c * (1 - reserve(J)))
//! ```
//!
//! where `J_m` is the jackpot in millions and `z ~ N(0, 1)`. The noise term
//! is a mean-one lognormal, so it perturbs volume without biasing it.

use chrono::Weekday;

use super::rules::{clamp_jackpot, JACKPOT_CONTRIBUTION, TICKET_PRICE};
use crate::engine::rng::SimRng;

/// Sales scale at a $1M jackpot with unit factors.
pub const SALES_ALPHA: f64 = 10_000_000.0;
/// Log-scale spread of the sales noise.
pub const SALES_SIGMA: f64 = 0.182;

/// Sales elasticity to jackpot size.
///
/// 1.1 up to $500M, 1.5 from $900M, linear in between.
#[must_use]
pub fn sales_elasticity(jackpot: f64) -> f64 {
    let millions = jackpot / 1_000_000.0;
    if millions <= 500.0 {
        1.1
    } else if millions >= 900.0 {
        1.5
    } else {
        1.1 + (millions - 500.0) / 400.0 * 0.4
    }
}

/// Relative sales by draw day. Saturday sells best.
#[must_use]
pub const fn weekday_factor(day: Weekday) -> f64 {
    match day {
        Weekday::Mon => 0.85,
        Weekday::Wed => 1.0,
        _ => 1.3,
    }
}

/// Mean-one lognormal multiplier. Consumes one normal (two uniforms).
pub fn sales_noise(rng: &mut SimRng) -> f64 {
    let z = rng.gen_standard_normal();
    (z * SALES_SIGMA - 0.5 * SALES_SIGMA * SALES_SIGMA).exp()
}

/// Tickets sold by the market for one period, rounded and floored at zero.
pub fn tickets_sold(jackpot: f64, day: Weekday, rng: &mut SimRng) -> u64 {
    let millions = jackpot / 1_000_000.0;
    let beta = sales_elasticity(jackpot);
    let noise = sales_noise(rng);
    let volume = SALES_ALPHA * millions.powf(beta) * weekday_factor(day) * noise;
    if volume.is_finite() && volume > 0.0 {
        volume.round() as u64
    } else {
        0
    }
}

/// Fraction of jackpot contributions withheld for the prize reserve.
///
/// 5% under $50M, nothing from $200M, linear in between.
#[must_use]
pub fn reserve_deduction_rate(jackpot: f64) -> f64 {
    let millions = jackpot / 1_000_000.0;
    if millions < 50.0 {
        0.05
    } else if millions >= 200.0 {
        0.0
    } else {
        0.05 * (1.0 - (millions - 50.0) / 150.0)
    }
}

/// Jackpot after a period without a winner.
///
/// Only base ticket revenue feeds the pool; add-on revenue does not.
#[must_use]
pub fn grow_jackpot(jackpot: f64, tickets_sold: u64) -> f64 {
    let revenue = tickets_sold as f64 * TICKET_PRICE;
    let contribution = revenue * JACKPOT_CONTRIBUTION * (1.0 - reserve_deduction_rate(jackpot));
    clamp_jackpot(jackpot + contribution)
}
