use crate::{experiment::Frequencies, statistics::roller::Roller};

/// Prefix sums of a probability vector, used to invert a uniform draw into a
/// category index.
#[derive(Debug, Clone, PartialEq)]
pub struct CumulativeTable {
    bounds: Vec<f64>,
}

impl CumulativeTable {
    pub fn new(probabilities: &[f64]) -> Self {
        let bounds = probabilities
            .iter()
            .scan(0.0, |acc, &p| {
                *acc += p;
                Some(*acc)
            })
            .collect();
        Self { bounds }
    }

    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    pub fn bounds(&self) -> &[f64] {
        &self.bounds
    }

    /// First category whose cumulative bound is at least `u`.
    ///
    /// When the bounds fall short of 1.0 and `u` lands past the last one, the
    /// draw goes to the last category so no trial is ever dropped.
    pub fn index_of(&self, u: f64) -> usize {
        self.bounds
            .iter()
            .position(|&bound| u <= bound)
            .unwrap_or(self.bounds.len().saturating_sub(1))
    }

    pub fn sample(&self, roller: &mut Roller) -> usize {
        self.index_of(roller.unit())
    }

    /// Runs `n` independent trials and tallies them per category.
    pub fn simulate(&self, n: u64, roller: &mut Roller) -> Frequencies {
        let mut frequencies = Frequencies::zeros(self.len());
        if self.is_empty() {
            return frequencies;
        }
        for _ in 0..n {
            frequencies.record(self.sample(roller));
        }
        frequencies
    }
}

/// Draws a single category index from `probabilities`.
pub fn sample_one_trial(probabilities: &[f64], roller: &mut Roller) -> usize {
    CumulativeTable::new(probabilities).sample(roller)
}

/// Simulates one experiment of `n` trials.
pub fn simulate_trial(n: u64, probabilities: &[f64], roller: &mut Roller) -> Frequencies {
    CumulativeTable::new(probabilities).simulate(n, roller)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cumulative_bounds() {
        let table = CumulativeTable::new(&[0.5, 0.25, 0.25]);
        assert_eq!(table.bounds(), &[0.5, 0.75, 1.0]);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_index_of() {
        let table = CumulativeTable::new(&[0.5, 0.25, 0.25]);
        assert_eq!(table.index_of(0.0), 0);
        assert_eq!(table.index_of(0.5), 0);
        assert_eq!(table.index_of(0.6), 1);
        assert_eq!(table.index_of(0.75), 1);
        assert_eq!(table.index_of(0.99), 2);
    }

    #[test]
    fn test_index_past_last_bound_goes_to_last_category() {
        let table = CumulativeTable::new(&[0.33, 0.33, 0.33]);
        assert_eq!(table.index_of(0.995), 2);
    }

    #[test]
    fn test_sample_one_trial_in_range() {
        let mut roller = Roller::test_rng();
        for _ in 0..1000 {
            assert!(sample_one_trial(&[0.2, 0.3, 0.5], &mut roller) < 3);
        }
    }

    #[test]
    fn test_single_category() {
        let mut roller = Roller::test_rng();
        let frequencies = simulate_trial(50, &[1.0], &mut roller);
        assert_eq!(frequencies.as_slice(), &[50]);
    }

    #[test]
    fn test_no_draw_is_lost_when_probabilities_fall_short() {
        let mut roller = Roller::test_rng();
        for _ in 0..200 {
            let frequencies = simulate_trial(40, &[0.33, 0.33, 0.33], &mut roller);
            assert_eq!(frequencies.total(), Some(40));
        }
    }

    #[test]
    fn test_zero_trials() {
        let mut roller = Roller::test_rng();
        let frequencies = simulate_trial(0, &[0.5, 0.5], &mut roller);
        assert_eq!(frequencies.as_slice(), &[0, 0]);
    }

    #[test]
    fn test_frequencies_follow_probabilities() {
        let mut roller = Roller::test_rng();
        let frequencies = simulate_trial(100_000, &[0.2, 0.8], &mut roller);
        assert!(
            (19_000..=21_000).contains(&frequencies[0]),
            "{:?}",
            frequencies
        );
    }

    #[test]
    fn test_seeded_simulation_is_reproducible() {
        let a = simulate_trial(100, &[0.1, 0.2, 0.7], &mut Roller::from_seed(3));
        let b = simulate_trial(100, &[0.1, 0.2, 0.7], &mut Roller::from_seed(3));
        assert_eq!(a, b);
    }
}
