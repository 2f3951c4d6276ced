use rand::Rng;

/// Samples node heights from a geometric distribution truncated at `max_level`.
#[derive(Debug, Clone)]
pub struct LevelGenerator<R> {
    max_level: usize,
    skip_probability: f64,
    rng: R,
}

impl<R: Rng> LevelGenerator<R> {
    /// `max_level >= 1` and `0 < skip_probability < 1` are checked by the caller.
    pub(crate) fn new(max_level: usize, skip_probability: f64, rng: R) -> Self {
        debug_assert!(max_level > 0);
        debug_assert!(skip_probability > 0.0 && skip_probability < 1.0);
        Self {
            max_level,
            skip_probability,
            rng,
        }
    }

    pub fn random_level(&mut self) -> usize {
        let mut level = 1;
        while level < self.max_level && self.rng.gen_bool(self.skip_probability) {
            level += 1;
        }
        level // [1, max_level]
    }
}

impl<R> LevelGenerator<R> {
    pub fn max_level(&self) -> usize {
        self.max_level
    }

    pub fn skip_probability(&self) -> f64 {
        self.skip_probability
    }
}
