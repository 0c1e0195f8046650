//! Progress increment sources.
//!
//! The simulator asks its source for one increment per tick. Production uses
//! `RandomIncrement`; tests and scripted demos plug in a fixed sequence or a
//! closure.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use valis_core::SimulatorConfig;

/// Supplies the raw progress increment for each tick.
pub trait ProgressSource: Send {
    fn next_increment(&mut self) -> f64;
}

impl<F> ProgressSource for F
where
    F: FnMut() -> f64 + Send,
{
    fn next_increment(&mut self) -> f64 {
        self()
    }
}

/// Uniform random increments in `[min, max)`.
pub struct RandomIncrement {
    rng: StdRng,
    min: f64,
    max: f64,
}

impl RandomIncrement {
    pub fn new(min: f64, max: f64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng, min, max }
    }

    pub fn from_config(config: &SimulatorConfig) -> Self {
        Self::new(config.min_increment, config.max_increment, config.seed)
    }
}

impl ProgressSource for RandomIncrement {
    fn next_increment(&mut self) -> f64 {
        if self.max > self.min {
            self.rng.gen_range(self.min..self.max)
        } else {
            self.min
        }
    }
}

/// Cycles through a fixed list of increments.
#[derive(Debug, Clone)]
pub struct SequenceIncrement {
    values: Vec<f64>,
    position: usize,
}

impl SequenceIncrement {
    /// An empty list yields 0.0 on every tick.
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self {
            values: values.into(),
            position: 0,
        }
    }
}

impl ProgressSource for SequenceIncrement {
    fn next_increment(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.position % self.values.len()];
        self.position += 1;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_increment_stays_in_range() {
        let mut source = RandomIncrement::new(1.0, 20.0, Some(42));
        for _ in 0..1000 {
            let value = source.next_increment();
            assert!((1.0..20.0).contains(&value), "out of range: {value}");
        }
    }

    #[test]
    fn test_seeded_sources_repeat() {
        let mut a = RandomIncrement::new(0.5, 20.0, Some(7));
        let mut b = RandomIncrement::new(0.5, 20.0, Some(7));
        for _ in 0..16 {
            assert_eq!(a.next_increment(), b.next_increment());
        }
    }

    #[test]
    fn test_degenerate_range_returns_min() {
        let mut source = RandomIncrement::new(5.0, 5.0, None);
        assert_eq!(source.next_increment(), 5.0);
    }

    #[test]
    fn test_sequence_cycles() {
        let mut source = SequenceIncrement::new(vec![1.0, 2.0]);
        let drawn: Vec<f64> = (0..5).map(|_| source.next_increment()).collect();
        assert_eq!(drawn, vec![1.0, 2.0, 1.0, 2.0, 1.0]);
    }

    #[test]
    fn test_closure_source() {
        let mut calls = 0;
        let mut source = move || {
            calls += 1;
            calls as f64
        };
        assert_eq!(source.next_increment(), 1.0);
        assert_eq!(source.next_increment(), 2.0);
    }
}
