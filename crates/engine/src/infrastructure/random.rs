//! Random implementations.

use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::infrastructure::ports::RandomPort;

/// System random - uses real randomness.
pub struct SystemRandom;

impl SystemRandom {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomPort for SystemRandom {
    fn gen_range(&self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        rand::thread_rng().gen_range(min..=max)
    }
}

/// Deterministic random from a fixed seed, for reproducible runs.
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomPort for SeededRandom {
    fn gen_range(&self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        self.rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .gen_range(min..=max)
    }
}

/// Fixed random for testing.
#[cfg(test)]
pub struct FixedRandom(pub i32);

#[cfg(test)]
impl RandomPort for FixedRandom {
    fn gen_range(&self, _min: i32, _max: i32) -> i32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_random_stays_in_range() {
        let random = SystemRandom::new();
        for _ in 0..100 {
            let value = random.gen_range(1, 3);
            assert!((1..=3).contains(&value));
        }
    }

    #[test]
    fn degenerate_range_returns_min() {
        assert_eq!(SystemRandom::new().gen_range(4, 4), 4);
        assert_eq!(SeededRandom::new(1).gen_range(7, 2), 7);
    }

    #[test]
    fn same_seed_same_sequence() {
        let a = SeededRandom::new(42);
        let b = SeededRandom::new(42);
        let left: Vec<_> = (0..10).map(|_| a.gen_range(0, 1000)).collect();
        let right: Vec<_> = (0..10).map(|_| b.gen_range(0, 1000)).collect();
        assert_eq!(left, right);
    }
}
