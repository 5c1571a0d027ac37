/// Absolute tolerance on the probability sum.
pub const SUM_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{what} has {actual} entries but {expected} categories were given")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("probabilities must sum to 1 (actual sum: {sum:.4})")]
    ProbabilitySum { sum: f64 },
    #[error("probability at position {index} must be greater than 0 (got {value})")]
    NonPositiveProbability { index: usize, value: f64 },
    #[error("frequencies must sum to {expected} (actual sum: {actual})")]
    FrequencySum { expected: u64, actual: i128 },
    #[error("frequency at position {index} must not be negative (got {value})")]
    NegativeFrequency { index: usize, value: i64 },
}

/// Checks a probability vector and, optionally, a target outcome of `n`
/// trials given as signed frequencies.
///
/// Checks run in a fixed order and the first failure is reported:
/// probability sum, probability positivity, frequency sum, frequency sign.
pub fn validate(
    probabilities: &[f64],
    outcome: Option<(&[i64], u64)>,
) -> Result<(), ValidationError> {
    let sum: f64 = probabilities.iter().sum();
    if !((1.0 - SUM_TOLERANCE)..=(1.0 + SUM_TOLERANCE)).contains(&sum) {
        return Err(ValidationError::ProbabilitySum { sum });
    }

    if let Some((index, &value)) = probabilities
        .iter()
        .enumerate()
        .find(|(_, p)| p.is_nan() || **p <= 0.0)
    {
        return Err(ValidationError::NonPositiveProbability { index, value });
    }

    if let Some((frequencies, n)) = outcome {
        let actual: i128 = frequencies.iter().map(|&f| f as i128).sum();
        if actual != n as i128 {
            return Err(ValidationError::FrequencySum {
                expected: n,
                actual,
            });
        }

        if let Some((index, &value)) = frequencies.iter().enumerate().find(|(_, f)| **f < 0) {
            return Err(ValidationError::NegativeFrequency { index, value });
        }
    }

    Ok(())
}

/// Fails with `LengthMismatch` unless `actual == expected`.
pub fn check_length(
    what: &'static str,
    expected: usize,
    actual: usize,
) -> Result<(), ValidationError> {
    if expected != actual {
        return Err(ValidationError::LengthMismatch {
            what,
            expected,
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_probabilities() {
        assert_eq!(validate(&[0.5, 0.3, 0.2], None), Ok(()));
        assert_eq!(validate(&[1.0], None), Ok(()));
        assert_eq!(validate(&[0.333, 0.333, 0.333], None), Ok(()));
    }

    #[test]
    fn test_probability_sum_out_of_tolerance() {
        let err = validate(&[0.5, 0.3], None).unwrap_err();
        assert!(matches!(err, ValidationError::ProbabilitySum { sum } if (sum - 0.8).abs() < 1e-12));
        assert_eq!(err.to_string(), "probabilities must sum to 1 (actual sum: 0.8000)");

        assert!(matches!(
            validate(&[0.6, 0.6], None),
            Err(ValidationError::ProbabilitySum { .. })
        ));
    }

    #[test]
    fn test_empty_probabilities_fail_sum() {
        assert!(matches!(
            validate(&[], None),
            Err(ValidationError::ProbabilitySum { sum }) if sum == 0.0
        ));
    }

    #[test]
    fn test_non_positive_probability() {
        assert_eq!(
            validate(&[1.0, 0.0], None),
            Err(ValidationError::NonPositiveProbability {
                index: 1,
                value: 0.0
            })
        );
        assert_eq!(
            validate(&[1.1, -0.1], None),
            Err(ValidationError::NonPositiveProbability {
                index: 1,
                value: -0.1
            })
        );
    }

    #[test]
    fn test_nan_probability() {
        assert!(validate(&[f64::NAN, 1.0], None).is_err());
    }

    #[test]
    fn test_sum_checked_before_positivity() {
        assert!(matches!(
            validate(&[0.5, -0.5], Some((&[1, 1], 2))),
            Err(ValidationError::ProbabilitySum { .. })
        ));
    }

    #[test]
    fn test_frequency_sum() {
        assert_eq!(
            validate(&[0.5, 0.5], Some((&[3, 3], 5))),
            Err(ValidationError::FrequencySum {
                expected: 5,
                actual: 6
            })
        );
        assert_eq!(validate(&[0.5, 0.5], Some((&[2, 3], 5))), Ok(()));
    }

    #[test]
    fn test_negative_frequency_that_sums_to_n() {
        let err = validate(&[0.5, 0.5], Some((&[-1, 11], 10))).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NegativeFrequency {
                index: 0,
                value: -1
            }
        );
        assert_eq!(
            err.to_string(),
            "frequency at position 0 must not be negative (got -1)"
        );
    }

    #[test]
    fn test_frequency_sum_checked_before_sign() {
        assert!(matches!(
            validate(&[0.5, 0.5], Some((&[-1, 3], 10))),
            Err(ValidationError::FrequencySum { .. })
        ));
    }

    #[test]
    fn test_check_length() {
        assert_eq!(check_length("probabilities", 2, 2), Ok(()));
        let err = check_length("probabilities", 3, 2).unwrap_err();
        assert_eq!(
            err.to_string(),
            "probabilities has 2 entries but 3 categories were given"
        );
    }
}
