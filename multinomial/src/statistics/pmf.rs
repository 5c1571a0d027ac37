use serde::{Deserialize, Serialize};

/// `n!` by iterative multiplication. Saturates to infinity once the product
/// leaves the `f64` range (n > 170); the loop stops there.
pub fn factorial(n: u64) -> f64 {
    (2..=n)
        .try_fold(1.0_f64, |acc, k| {
            let next = acc * k as f64;
            if next.is_infinite() { Err(next) } else { Ok(next) }
        })
        .unwrap_or_else(|saturated| saturated)
}

/// `base` multiplied by itself `exponent` times; `power(x, 0) == 1` for every
/// `x`, including zero.
pub fn power(base: f64, exponent: u64) -> f64 {
    let mut acc = 1.0;
    for _ in 0..exponent {
        let next = acc * base;
        // 0, 1, infinity and underflowed products never change again
        if next == acc {
            break;
        }
        acc = next;
    }
    acc
}

/// Number of distinct orderings of `n` trials that produce `counts`.
///
/// Callers must make sure `counts` sums to `n`; this is not checked here.
pub fn multinomial_coefficient(n: u64, counts: &[u64]) -> f64 {
    let numerator = factorial(n);
    let denominator: f64 = counts.iter().map(|&k| factorial(k)).product();
    numerator / denominator
}

/// Sum of `counts`, or `None` on overflow.
pub fn total(counts: &[u64]) -> Option<u64> {
    counts
        .iter()
        .try_fold(0u64, |acc, &count| acc.checked_add(count))
}

/// Exact probability of observing `counts` after `n` independent trials.
///
/// An outcome whose counts do not add up to `n` cannot happen, so it has
/// probability zero rather than being an error.
pub fn multinomial_density(n: u64, counts: &[u64], probabilities: &[f64]) -> f64 {
    debug_assert_eq!(counts.len(), probabilities.len());
    if total(counts) != Some(n) {
        return 0.0;
    }
    multinomial_coefficient(n, counts) * product_of_powers(counts, probabilities)
}

fn product_of_powers(counts: &[u64], probabilities: &[f64]) -> f64 {
    counts
        .iter()
        .zip(probabilities.iter())
        .map(|(&k, &p)| power(p, k))
        .product()
}

/// `n * p_i` for every category.
pub fn expected_frequencies(n: u64, probabilities: &[f64]) -> Vec<f64> {
    probabilities.iter().map(|&p| n as f64 * p).collect()
}

/// One `p^k` factor of the density.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerTerm {
    pub probability: f64,
    pub exponent: u64,
    pub value: f64,
}

impl PowerTerm {
    pub fn new(probability: f64, exponent: u64) -> Self {
        Self {
            probability,
            exponent,
            value: power(probability, exponent),
        }
    }

    pub fn pretty_print(&self, f: &mut impl std::fmt::Write) -> std::fmt::Result {
        write!(f, "{}^{}", self.probability, self.exponent)
    }

    pub fn label(&self) -> String {
        let mut buf = String::new();
        self.pretty_print(&mut buf).ok();
        buf
    }
}

/// The density together with the intermediate values it was built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityBreakdown {
    pub coefficient: f64,
    pub product: f64,
    pub terms: Vec<PowerTerm>,
    pub density: f64,
}

impl DensityBreakdown {
    pub fn is_finite(&self) -> bool {
        self.coefficient.is_finite() && self.product.is_finite() && self.density.is_finite()
    }
}

pub fn density_breakdown(n: u64, counts: &[u64], probabilities: &[f64]) -> DensityBreakdown {
    let terms: Vec<PowerTerm> = counts
        .iter()
        .zip(probabilities.iter())
        .map(|(&k, &p)| PowerTerm::new(p, k))
        .collect();
    let product = terms.iter().map(|term| term.value).product();
    let coefficient = multinomial_coefficient(n, counts);
    let density = multinomial_density(n, counts, probabilities);
    DensityBreakdown {
        coefficient,
        product,
        terms,
        density,
    }
}
