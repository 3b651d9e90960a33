//! xorshift64* random number generator
//!
//! Fast, deterministic PRNG suitable for simulation purposes.
//!
//! # Determinism
//!
//! Same seed → same sequence of random numbers. Demand generation samples
//! every passenger unit through this generator, so a seed fully determines
//! where passengers want to go and which location they wait at.

use serde::{Deserialize, Serialize};

/// Deterministic random number generator using xorshift64*
///
/// # Example
/// ```
/// use airline_simulator_core_rs::RngManager;
///
/// let mut rng = RngManager::new(12345);
/// let value = rng.next_f64();
/// assert!((0.0..1.0).contains(&value));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngManager {
    /// Internal state (64-bit)
    state: u64,
}

impl RngManager {
    /// Create a new RNG with given seed
    pub fn new(seed: u64) -> Self {
        // xorshift must never hold a zero state
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u64 value
    pub fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Get current RNG state (for checkpointing/replay)
    ///
    /// `RngManager::new(rng.get_state())` continues the same sequence.
    pub fn get_state(&self) -> u64 {
        self.state
    }

    /// Generate random f64 in range [0.0, 1.0)
    pub fn next_f64(&mut self) -> f64 {
        let value = self.next();
        (value >> 11) as f64 * (1.0 / ((1u64 << 53) as f64))
    }

    /// Sample an index from a cumulative weight table
    ///
    /// `cumulative` must be non-decreasing with a positive last element.
    /// Returns `None` for an empty or all-zero table.
    ///
    /// # Example
    /// ```
    /// use airline_simulator_core_rs::RngManager;
    ///
    /// let mut rng = RngManager::new(7);
    /// // weights 1, 0, 3
    /// let idx = rng.weighted_index(&[1.0, 1.0, 4.0]).unwrap();
    /// assert_ne!(idx, 1);
    /// ```
    pub fn weighted_index(&mut self, cumulative: &[f64]) -> Option<usize> {
        let total = *cumulative.last()?;
        if !(total > 0.0) {
            return None;
        }

        let target = self.next_f64() * total;
        let idx = cumulative.partition_point(|&c| c <= target);
        Some(idx.min(cumulative.len() - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_seed_converted_to_nonzero() {
        let rng = RngManager::new(0);
        assert_ne!(rng.get_state(), 0, "Zero seed should be converted to 1");
    }

    #[test]
    fn test_next_f64_in_range() {
        let mut rng = RngManager::new(12345);

        for _ in 0..1000 {
            let val = rng.next_f64();
            assert!(
                (0.0..1.0).contains(&val),
                "next_f64() produced value {} outside [0.0, 1.0)",
                val
            );
        }
    }

    #[test]
    fn test_state_resume_continues_sequence() {
        let mut rng = RngManager::new(99999);
        rng.next();
        let mut resumed = RngManager::new(rng.get_state());

        for _ in 0..100 {
            assert_eq!(rng.next(), resumed.next());
        }
    }

    #[test]
    fn test_weighted_index_skips_zero_weights() {
        let mut rng = RngManager::new(42);
        let cumulative = [0.0, 2.0, 2.0, 5.0];

        for _ in 0..500 {
            let idx = rng.weighted_index(&cumulative).unwrap();
            assert!(idx == 1 || idx == 3, "picked zero-weight index {}", idx);
        }
    }

    #[test]
    fn test_weighted_index_empty_or_zero() {
        let mut rng = RngManager::new(42);
        assert_eq!(rng.weighted_index(&[]), None);
        assert_eq!(rng.weighted_index(&[0.0, 0.0]), None);
    }
}
