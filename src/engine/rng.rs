//! Deterministic random number generation.
//!
//! Every stochastic decision in a run (sales noise, market winners, draws,
//! multipliers, player tickets) is taken from one PCG stream seeded by the
//! 32-bit run seed. Samplers consume a fixed number of uniforms per call,
//! or a number that depends only on earlier uniforms, so two runs with the
//! same seed and configuration consume the stream identically.
//!
//! # Reproducibility Guarantee
//!
//! Given the same seed, all sequences are bitwise-identical across runs
//! and platforms. A second stream exists only through [`SimRng::derive`],
//! which XORs an explicit salt into the master seed.

use std::collections::BTreeSet;

use rand::prelude::*;
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};

/// Largest Poisson mean sampled in a single Knuth pass.
///
/// `e^-lambda` underflows past ~745; larger means are split into chunks
/// and summed, which is exact by additivity of independent Poissons.
const POISSON_CHUNK: f64 = 500.0;

/// Deterministic, reproducible random number generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimRng {
    /// Master seed for reproducibility.
    master_seed: u64,
    /// Number of uniforms drawn so far.
    draws: u64,
    /// Internal PCG state.
    rng: Pcg64,
}

impl SimRng {
    /// Create a new RNG with the given master seed.
    #[must_use]
    pub fn new(master_seed: u64) -> Self {
        Self {
            master_seed,
            draws: 0,
            rng: Pcg64::seed_from_u64(master_seed),
        }
    }

    /// Get the master seed.
    #[must_use]
    pub const fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// Number of uniforms consumed from this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }

    /// Create an independent stream whose seed is `master_seed ^ salt`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use lotto_logic::engine::rng::SimRng;
    ///
    /// let main = SimRng::new(7);
    /// let side = main.derive(0xA5A5_F00D);
    /// assert_eq!(side.master_seed(), 7 ^ 0xA5A5_F00D);
    /// ```
    #[must_use]
    pub fn derive(&self, salt: u64) -> Self {
        Self::new(self.master_seed ^ salt)
    }

    /// Generate a random f64 in [0, 1).
    pub fn gen_f64(&mut self) -> f64 {
        self.draws += 1;
        self.rng.gen()
    }

    /// Uniform index in `0..n` taken as `floor(u * n)` from one uniform.
    ///
    /// Returns 0 when `n == 0` without consuming a draw.
    pub fn gen_index(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        let idx = (self.gen_f64() * n as f64).floor() as usize;
        idx.min(n - 1)
    }

    /// Generate a standard normal sample using Box-Muller transform.
    pub fn gen_standard_normal(&mut self) -> f64 {
        let u1 = self.gen_f64();
        let u2 = self.gen_f64();

        // Avoid log(0)
        let u1 = if u1 < f64::EPSILON { f64::EPSILON } else { u1 };

        (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
    }

    /// Poisson count with mean `lambda` (Knuth multiplication).
    ///
    /// Non-positive or non-finite means yield 0 without consuming draws.
    pub fn gen_poisson(&mut self, lambda: f64) -> u64 {
        if !(lambda.is_finite() && lambda > 0.0) {
            return 0;
        }
        let mut remaining = lambda;
        let mut total = 0;
        while remaining > 0.0 {
            let chunk = remaining.min(POISSON_CHUNK);
            total += self.knuth_poisson(chunk);
            remaining -= chunk;
        }
        total
    }

    fn knuth_poisson(&mut self, lambda: f64) -> u64 {
        let threshold = (-lambda).exp();
        let mut k = 0;
        let mut p = 1.0;
        loop {
            k += 1;
            p *= self.gen_f64();
            if p <= threshold {
                return k - 1;
            }
        }
    }

    /// Weighted categorical choice by cumulative-weight subtraction.
    ///
    /// Draws `r = floor(u * total) + 1` and walks the items subtracting
    /// weights until `r <= 0`. Returns `None` for an empty slice.
    pub fn pick_weighted<T: Copy>(&mut self, items: &[(T, u32)]) -> Option<T> {
        let first = items.first()?.0;
        let total: u64 = items.iter().map(|&(_, w)| u64::from(w)).sum();
        let mut r = (self.gen_f64() * total as f64).floor() as i64 + 1;
        for &(value, weight) in items {
            r -= i64::from(weight);
            if r <= 0 {
                return Some(value);
            }
        }
        Some(first)
    }

    /// Sample `k` distinct integers from `1..=n`, returned ascending.
    ///
    /// Uses rejection into a growing set, so the number of uniforms consumed
    /// depends on collisions but never on anything outside this stream.
    ///
    /// # Panics
    ///
    /// Panics if `k > n`.
    pub fn pick_k_distinct(&mut self, n: u8, k: usize) -> Vec<u8> {
        assert!(k <= usize::from(n), "cannot pick {k} distinct from {n}");
        let mut set = BTreeSet::new();
        while set.len() < k {
            let value = 1 + self.gen_index(usize::from(n)) as u8;
            set.insert(value);
        }
        set.into_iter().collect()
    }

    /// Fisher-Yates shuffle driven by this stream.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.gen_index(i + 1);
            items.swap(i, j);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Property: Same seed produces same sequence.
    #[test]
    fn test_reproducibility() {
        let mut rng1 = SimRng::new(42);
        let mut rng2 = SimRng::new(42);

        let seq1: Vec<f64> = (0..100).map(|_| rng1.gen_f64()).collect();
        let seq2: Vec<f64> = (0..100).map(|_| rng2.gen_f64()).collect();

        assert_eq!(seq1, seq2, "Same seed must produce identical sequences");
    }

    /// Property: Different seeds produce different sequences.
    #[test]
    fn test_different_seeds() {
        let mut rng1 = SimRng::new(42);
        let mut rng2 = SimRng::new(43);

        let seq1: Vec<f64> = (0..100).map(|_| rng1.gen_f64()).collect();
        let seq2: Vec<f64> = (0..100).map(|_| rng2.gen_f64()).collect();

        assert_ne!(seq1, seq2);
    }

    #[test]
    fn test_derived_stream_is_independent_and_stable() {
        let main = SimRng::new(1234);
        let mut a = main.derive(0xA5A5_F00D);
        let mut b = main.derive(0xA5A5_F00D);
        let mut m = SimRng::new(1234);

        let seq_a: Vec<f64> = (0..10).map(|_| a.gen_f64()).collect();
        let seq_b: Vec<f64> = (0..10).map(|_| b.gen_f64()).collect();
        let seq_m: Vec<f64> = (0..10).map(|_| m.gen_f64()).collect();

        assert_eq!(seq_a, seq_b);
        assert_ne!(seq_a, seq_m);
    }

    #[test]
    fn test_draw_counter() {
        let mut rng = SimRng::new(9);
        assert_eq!(rng.draws(), 0);
        let _ = rng.gen_standard_normal();
        assert_eq!(rng.draws(), 2, "Box-Muller consumes exactly two uniforms");
        let _ = rng.gen_index(10);
        assert_eq!(rng.draws(), 3);
    }

    #[test]
    fn test_gen_index_bounds() {
        let mut rng = SimRng::new(5);
        for _ in 0..5000 {
            assert!(rng.gen_index(26) < 26);
        }
        assert_eq!(rng.gen_index(0), 0);
    }

    /// Property: Normal distribution has correct moments.
    #[test]
    fn test_normal_distribution() {
        let mut rng = SimRng::new(42);
        let n = 10000;
        let samples: Vec<f64> = (0..n).map(|_| rng.gen_standard_normal()).collect();

        let mean: f64 = samples.iter().sum::<f64>() / n as f64;
        let variance: f64 = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;

        assert!(mean.abs() < 0.1, "Mean {mean} too far from 0");
        assert!((variance - 1.0).abs() < 0.1, "Variance {variance} too far from 1");
    }

    #[test]
    fn test_standard_normal_epsilon_guard() {
        let mut rng = SimRng::new(12345);
        for _ in 0..50000 {
            let v = rng.gen_standard_normal();
            assert!(v.is_finite(), "gen_standard_normal produced non-finite value: {v}");
        }
    }

    #[test]
    fn test_poisson_mean_small_lambda() {
        let mut rng = SimRng::new(77);
        let n = 20000;
        let lambda = 0.8;
        let total: u64 = (0..n).map(|_| rng.gen_poisson(lambda)).sum();
        let mean = total as f64 / f64::from(n);
        // std error = sqrt(0.8 / 20000) ~ 0.0063
        assert!((mean - lambda).abs() < 0.04, "Poisson mean {mean} far from {lambda}");
    }

    #[test]
    fn test_poisson_large_lambda_does_not_underflow() {
        let mut rng = SimRng::new(3);
        let n = 200;
        let lambda = 1800.0;
        let total: u64 = (0..n).map(|_| rng.gen_poisson(lambda)).sum();
        let mean = total as f64 / f64::from(n);
        // std error = sqrt(1800 / 200) = 3
        assert!((mean - lambda).abs() < 20.0, "Poisson mean {mean} far from {lambda}");
    }

    #[test]
    fn test_poisson_degenerate_means() {
        let mut rng = SimRng::new(1);
        assert_eq!(rng.gen_poisson(0.0), 0);
        assert_eq!(rng.gen_poisson(-3.0), 0);
        assert_eq!(rng.gen_poisson(f64::NAN), 0);
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn test_pick_weighted_frequencies() {
        let mut rng = SimRng::new(11);
        let wheel = [(2u32, 24u32), (3, 13), (4, 3), (5, 2)];
        let mut counts = [0u32; 6];
        let n = 42_000;
        for _ in 0..n {
            let v = rng.pick_weighted(&wheel).unwrap_or(0);
            counts[v as usize] += 1;
        }
        let freq2 = f64::from(counts[2]) / f64::from(n);
        let freq5 = f64::from(counts[5]) / f64::from(n);
        assert!((freq2 - 24.0 / 42.0).abs() < 0.02, "2x frequency {freq2}");
        assert!((freq5 - 2.0 / 42.0).abs() < 0.01, "5x frequency {freq5}");
    }

    #[test]
    fn test_pick_weighted_empty() {
        let mut rng = SimRng::new(11);
        let empty: [(u32, u32); 0] = [];
        assert_eq!(rng.pick_weighted(&empty), None);
    }

    #[test]
    fn test_pick_k_distinct_sorted_and_in_range() {
        let mut rng = SimRng::new(8);
        for _ in 0..1000 {
            let picked = rng.pick_k_distinct(69, 5);
            assert_eq!(picked.len(), 5);
            assert!(picked.windows(2).all(|w| w[0] < w[1]));
            assert!(picked.iter().all(|&x| (1..=69).contains(&x)));
        }
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = SimRng::new(21);
        let mut items: Vec<u32> = (0..50).collect();
        rng.shuffle(&mut items);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..50).collect::<Vec<_>>());
        assert_ne!(items, sorted, "50 items should not shuffle to identity");
    }

    #[test]
    fn test_sim_rng_debug() {
        let rng = SimRng::new(42);
        let debug = format!("{rng:?}");
        assert!(debug.contains("SimRng"));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Falsification test: reproducibility holds for any 32-bit seed.
        #[test]
        fn prop_reproducibility(seed in any::<u32>()) {
            let mut rng1 = SimRng::new(u64::from(seed));
            let mut rng2 = SimRng::new(u64::from(seed));

            let seq1: Vec<f64> = (0..100).map(|_| rng1.gen_f64()).collect();
            let seq2: Vec<f64> = (0..100).map(|_| rng2.gen_f64()).collect();

            prop_assert_eq!(seq1, seq2);
        }

        /// Falsification test: values in [0, 1) for any seed.
        #[test]
        fn prop_unit_interval(seed in any::<u32>()) {
            let mut rng = SimRng::new(u64::from(seed));
            for _ in 0..100 {
                let v = rng.gen_f64();
                prop_assert!((0.0..1.0).contains(&v), "Value {} not in [0, 1)", v);
            }
        }

        /// Falsification test: k-distinct sampling never repeats.
        #[test]
        fn prop_k_distinct(seed in any::<u32>(), k in 1usize..=10) {
            let mut rng = SimRng::new(u64::from(seed));
            let picked = rng.pick_k_distinct(26, k);
            prop_assert_eq!(picked.len(), k);
            prop_assert!(picked.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
