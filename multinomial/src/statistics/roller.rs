use rand::{Rng, SeedableRng, rngs::StdRng};

/// Source of randomness for sampling. Always passed explicitly so runs can be
/// reproduced from a seed.
#[derive(Debug, Clone)]
pub struct Roller {
    rng: StdRng,
}

impl Roller {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let rng = StdRng::from_os_rng();
        Roller { rng }
    }

    /// Creates a new `Roller` instance with a different random seed.
    /// Useful for handing independent generators to concurrent requests.
    pub fn fork(&mut self) -> Self {
        let mut seed = [0u8; 32];
        self.rng.fill(&mut seed);
        let rng = StdRng::from_seed(seed);
        Roller { rng }
    }

    pub fn from_seed(seed: u64) -> Self {
        let rng = StdRng::seed_from_u64(seed);
        Roller { rng }
    }

    /// Uniform draw in `[0, 1)`.
    pub fn unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    #[cfg(test)]
    pub fn test_rng() -> Self {
        Self::from_seed(42)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_range() {
        let mut roller = Roller::test_rng();
        for _ in 0..10000 {
            let u = roller.unit();
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn test_seeded_rollers_agree() {
        let mut a = Roller::from_seed(7);
        let mut b = Roller::from_seed(7);
        for _ in 0..100 {
            assert_eq!(a.unit(), b.unit());
        }
    }

    #[test]
    fn test_fork_is_independent_but_reproducible() {
        let mut parent_a = Roller::test_rng();
        let mut parent_b = Roller::test_rng();
        let mut child_a = parent_a.fork();
        let mut child_b = parent_b.fork();
        let draws_a: Vec<f64> = (0..10).map(|_| child_a.unit()).collect();
        let draws_b: Vec<f64> = (0..10).map(|_| child_b.unit()).collect();
        assert_eq!(draws_a, draws_b);

        let parent_draws: Vec<f64> = (0..10).map(|_| parent_a.unit()).collect();
        assert_ne!(draws_a, parent_draws);
    }
}
