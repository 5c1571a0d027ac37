use derive_more::{Deref, From, IntoIterator};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    simulation::sampler::CumulativeTable,
    statistics::{
        pmf::{DensityBreakdown, density_breakdown, expected_frequencies, factorial, total},
        roller::Roller,
        validation::{ValidationError, check_length, validate},
    },
};

/// Per-category counts of one multinomial experiment.
#[derive(
    Debug, Default, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Deref, From, IntoIterator,
)]
#[serde(transparent)]
#[into_iterator(owned, ref)]
pub struct Frequencies(Vec<u64>);

impl Frequencies {
    pub fn zeros(k: usize) -> Self {
        Frequencies(vec![0; k])
    }

    pub fn record(&mut self, category: usize) {
        self.0[category] += 1;
    }

    /// Sum of all counts, `None` on overflow.
    pub fn total(&self) -> Option<u64> {
        total(&self.0)
    }

    pub fn into_inner(self) -> Vec<u64> {
        self.0
    }
}

/// A validated experiment: `trials` independent draws over labelled
/// categories with a well-formed probability vector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Experiment {
    trials: u64,
    categories: Vec<String>,
    probabilities: Vec<f64>,
}

impl Experiment {
    pub fn new(
        trials: u64,
        categories: Vec<String>,
        probabilities: Vec<f64>,
    ) -> std::result::Result<Self, ValidationError> {
        check_length("probabilities", categories.len(), probabilities.len())?;
        validate(&probabilities, None)?;
        Ok(Self {
            trials,
            categories,
            probabilities,
        })
    }

    pub fn trials(&self) -> u64 {
        self.trials
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    pub fn num_categories(&self) -> usize {
        self.categories.len()
    }

    /// Validates a target outcome for this experiment. Frequencies are taken
    /// signed so that negative input is reported instead of rejected by type.
    pub fn outcome(&self, frequencies: &[i64]) -> std::result::Result<Frequencies, ValidationError> {
        check_length("frequencies", self.num_categories(), frequencies.len())?;
        validate(&self.probabilities, Some((frequencies, self.trials)))?;
        Ok(Frequencies(
            frequencies.iter().map(|&f| f as u64).collect(),
        ))
    }

    pub fn expected_frequencies(&self) -> Vec<f64> {
        expected_frequencies(self.trials, &self.probabilities)
    }

    /// Exact density of `outcome` with its intermediate values.
    pub fn density(&self, outcome: &Frequencies) -> Result<DensityBreakdown> {
        let not_finite = || {
            Error::Computation(format!(
                "density of {:?} over {} trials is not representable as a finite number",
                outcome.as_slice(),
                self.trials
            ))
        };
        if factorial(self.trials).is_infinite() {
            return Err(not_finite());
        }
        let breakdown = density_breakdown(self.trials, outcome, &self.probabilities);
        if !breakdown.is_finite() {
            return Err(not_finite());
        }
        Ok(breakdown)
    }

    /// Runs the experiment once.
    pub fn sample(&self, roller: &mut Roller) -> Frequencies {
        CumulativeTable::new(&self.probabilities).simulate(self.trials, roller)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_new_validates() {
        assert!(Experiment::new(10, labels(&["A", "B"]), vec![0.5, 0.5]).is_ok());
        assert!(matches!(
            Experiment::new(10, labels(&["A", "B"]), vec![0.5, 0.4]),
            Err(ValidationError::ProbabilitySum { .. })
        ));
        assert_eq!(
            Experiment::new(10, labels(&["A", "B", "C"]), vec![0.5, 0.5]),
            Err(ValidationError::LengthMismatch {
                what: "probabilities",
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn test_outcome_validation() {
        let experiment = Experiment::new(10, labels(&["A", "B"]), vec![0.5, 0.5]).unwrap();
        assert_eq!(
            experiment.outcome(&[4, 6]).unwrap(),
            Frequencies::from(vec![4, 6])
        );
        assert!(matches!(
            experiment.outcome(&[4, 5]),
            Err(ValidationError::FrequencySum { .. })
        ));
        assert!(matches!(
            experiment.outcome(&[-1, 11]),
            Err(ValidationError::NegativeFrequency { index: 0, value: -1 })
        ));
        assert!(matches!(
            experiment.outcome(&[10]),
            Err(ValidationError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_expected_frequencies() {
        let experiment = Experiment::new(10, labels(&["A", "B"]), vec![0.5, 0.5]).unwrap();
        assert_eq!(experiment.expected_frequencies(), vec![5.0, 5.0]);
    }

    #[test]
    fn test_density() {
        let experiment =
            Experiment::new(3, labels(&["A", "B", "C"]), vec![0.5, 0.3, 0.2]).unwrap();
        let outcome = experiment.outcome(&[3, 0, 0]).unwrap();
        let breakdown = experiment.density(&outcome).unwrap();
        assert_eq!(breakdown.density, 0.125);
        assert_eq!(breakdown.coefficient, 1.0);
    }

    #[test]
    fn test_density_overflow_is_computation_error() {
        let experiment = Experiment::new(200, labels(&["A"]), vec![1.0]).unwrap();
        let outcome = experiment.outcome(&[200]).unwrap();
        assert!(matches!(
            experiment.density(&outcome),
            Err(Error::Computation(_))
        ));
    }

    #[test]
    fn test_density_huge_trial_count_fails_fast() {
        let experiment =
            Experiment::new(3_000_000_000, labels(&["A", "B"]), vec![0.5, 0.5]).unwrap();
        let outcome = experiment.outcome(&[1_500_000_000, 1_500_000_000]).unwrap();
        let start = chrono::Utc::now();
        assert!(matches!(
            experiment.density(&outcome),
            Err(Error::Computation(_))
        ));
        assert!(chrono::Utc::now() - start < chrono::Duration::seconds(1));
    }

    #[test]
    fn test_sample_sums_to_trials() {
        let experiment =
            Experiment::new(25, labels(&["A", "B", "C"]), vec![0.5, 0.3, 0.2]).unwrap();
        let mut roller = Roller::test_rng();
        for _ in 0..100 {
            let observed = experiment.sample(&mut roller);
            assert_eq!(observed.len(), 3);
            assert_eq!(observed.total(), Some(25));
        }
    }

    #[test]
    fn test_frequencies_iterate() {
        let frequencies = Frequencies::from(vec![1, 2, 3]);
        let by_ref: u64 = (&frequencies).into_iter().sum();
        assert_eq!(by_ref, 6);
        assert_eq!(frequencies.into_iter().collect::<Vec<_>>(), vec![1, 2, 3]);
    }
}
