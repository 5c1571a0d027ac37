use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicU64, Ordering},
};

use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    experiment::{Experiment, Frequencies},
    simulation::sampler::CumulativeTable,
    statistics::{pmf::multinomial_density, roller::Roller},
};

pub type Timestamp = chrono::DateTime<chrono::Utc>;

pub const MIN_SIMULATIONS: u64 = 5_000;
pub const MAX_SIMULATIONS: u64 = 50_000;
/// Used when the target outcome is impossible and `10 / density` is undefined.
pub const IMPOSSIBLE_TARGET_SIMULATIONS: u64 = 10_000;

/// How often the deadline is checked, in simulations.
const DEADLINE_CHECK_INTERVAL: u64 = 256;

/// Number of experiments needed to expect about ten hits of an outcome with
/// the given density, clamped to `[MIN_SIMULATIONS, MAX_SIMULATIONS]`.
pub fn simulation_count(density: f64) -> u64 {
    if density > 0.0 {
        (10.0 / density)
            .round()
            .clamp(MIN_SIMULATIONS as f64, MAX_SIMULATIONS as f64) as u64
    } else {
        IMPOSSIBLE_TARGET_SIMULATIONS
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Concordance {
    #[serde(rename = "not applicable")]
    NotApplicable,
    #[serde(rename = "excellent")]
    Excellent,
    #[serde(rename = "good")]
    Good,
    #[serde(rename = "fair")]
    Fair,
}

impl Concordance {
    pub fn classify(exact_probability: f64, relative_deviation: f64) -> Self {
        if exact_probability <= 0.0 {
            Concordance::NotApplicable
        } else if relative_deviation < 10.0 {
            Concordance::Excellent
        } else if relative_deviation < 25.0 {
            Concordance::Good
        } else {
            Concordance::Fair
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Concordance::NotApplicable => "not applicable",
            Concordance::Excellent => "excellent",
            Concordance::Good => "good",
            Concordance::Fair => "fair",
        }
    }
}

impl std::fmt::Display for Concordance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResults {
    /// Simulations actually run.
    pub simulations: u64,
    /// Simulations the run was sized for before any deadline or cancellation.
    pub planned_simulations: u64,
    pub successes: u64,
    pub empirical_probability: f64,
    pub exact_probability: f64,
    pub absolute_deviation: f64,
    /// Percent of the exact probability; zero when that is zero.
    pub relative_deviation: f64,
    pub concordance: Concordance,
    /// Whether the deadline or a cancellation stopped the run early.
    pub truncated: bool,
    pub elapsed_ms: i64,
}

impl VerificationResults {
    pub fn new(
        exact_probability: f64,
        planned_simulations: u64,
        simulations: u64,
        successes: u64,
        elapsed: chrono::Duration,
    ) -> Self {
        let empirical_probability = if simulations > 0 {
            successes as f64 / simulations as f64
        } else {
            0.0
        };
        let absolute_deviation = (empirical_probability - exact_probability).abs();
        let relative_deviation = if exact_probability > 0.0 {
            absolute_deviation / exact_probability * 100.0
        } else {
            0.0
        };
        Self {
            simulations,
            planned_simulations,
            successes,
            empirical_probability,
            exact_probability,
            absolute_deviation,
            relative_deviation,
            // nothing to compare against without a single simulation
            concordance: if simulations == 0 {
                Concordance::NotApplicable
            } else {
                Concordance::classify(exact_probability, relative_deviation)
            },
            truncated: simulations < planned_simulations,
            elapsed_ms: elapsed.num_milliseconds(),
        }
    }

    pub fn print_summary(&self) {
        log::info!(
            "Verification: {}/{} simulations matched (empirical {:.6e}, exact {:.6e}, deviation {:.2}%, {})",
            self.successes,
            self.simulations,
            self.empirical_probability,
            self.exact_probability,
            self.relative_deviation,
            self.concordance,
        );
        if self.truncated {
            log::warn!(
                "Verification stopped early after {} of {} planned simulations",
                self.simulations,
                self.planned_simulations
            );
        }
    }
}

/// Cross-checks an exact density against Monte Carlo frequencies.
///
/// A run is bounded three ways: the clamped simulation count (further capped
/// by `max_simulations`), an optional wall-clock `deadline`, and the shared
/// `cancelled` flag, which another thread may set at any time.
pub struct Verifier {
    pub max_simulations: u64,
    pub deadline: Option<chrono::Duration>,
    pub cancelled: Arc<AtomicBool>,
    pub simulations_run: Arc<AtomicU64>,
    pub start_time: Timestamp,
    pub roller: Roller,
}

impl Verifier {
    pub fn new(roller: Roller) -> Self {
        Self {
            max_simulations: MAX_SIMULATIONS,
            deadline: None,
            cancelled: Arc::new(AtomicBool::new(false)),
            simulations_run: Arc::new(AtomicU64::new(0)),
            start_time: chrono::Utc::now(),
            roller,
        }
    }

    pub fn with_max_simulations(mut self, max_simulations: u64) -> Self {
        self.max_simulations = max_simulations;
        self
    }

    pub fn with_deadline(mut self, deadline: chrono::Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        self.cancelled.clone()
    }

    pub fn simulations_run(&self) -> u64 {
        self.simulations_run.load(Ordering::Relaxed)
    }

    pub fn elapsed_time(&self) -> chrono::Duration {
        chrono::Utc::now() - self.start_time
    }

    pub fn simulations_per_second(&self) -> f64 {
        let elapsed = self.elapsed_time().num_milliseconds() as f64 / 1000.0;
        if elapsed > 0.0 {
            self.simulations_run() as f64 / elapsed
        } else {
            0.0
        }
    }

    fn should_continue(&self, planned: u64) -> bool {
        let run = self.simulations_run();
        if run >= planned || self.cancelled.load(Ordering::Relaxed) {
            return false;
        }
        match self.deadline {
            Some(deadline) if run % DEADLINE_CHECK_INTERVAL == 0 => self.elapsed_time() < deadline,
            _ => true,
        }
    }

    /// Validated entry point: fails if the exact density cannot be computed.
    pub fn run(
        &mut self,
        experiment: &Experiment,
        target: &Frequencies,
    ) -> Result<VerificationResults> {
        experiment.density(target)?;
        Ok(self.verify(experiment.trials(), target, experiment.probabilities()))
    }

    /// Runs the verification on raw inputs. Inputs are assumed to be validated.
    pub fn verify(&mut self, n: u64, target: &[u64], probabilities: &[f64]) -> VerificationResults {
        let exact = multinomial_density(n, target, probabilities);
        let planned = simulation_count(exact).min(self.max_simulations);
        let table = CumulativeTable::new(probabilities);
        let progress_step = (planned / 10).max(1);

        log::debug!(
            "Verifying target {:?} over {} trials: exact density {:.6e}, {} simulations planned",
            target,
            n,
            exact,
            planned
        );

        self.simulations_run.store(0, Ordering::Relaxed);
        self.start_time = chrono::Utc::now();
        let mut successes = 0u64;
        while self.should_continue(planned) {
            let observed = table.simulate(n, &mut self.roller);
            if observed.as_slice() == target {
                successes += 1;
            }
            let run = self.simulations_run.fetch_add(1, Ordering::Relaxed) + 1;
            if run % progress_step == 0 {
                log::debug!("{}/{} simulations, {} successes", run, planned, successes);
            }
        }

        let results = VerificationResults::new(
            exact,
            planned,
            self.simulations_run(),
            successes,
            self.elapsed_time(),
        );
        log::info!(
            "Verification complete: {} simulations in {} ms ({:.0} simulations/sec)",
            results.simulations,
            results.elapsed_ms,
            self.simulations_per_second()
        );
        results
    }
}

/// Verifies `target` by simulation with a generator forked from `roller`.
pub fn verify_by_simulation(
    n: u64,
    target: &[u64],
    probabilities: &[f64],
    roller: &mut Roller,
) -> VerificationResults {
    Verifier::new(roller.fork()).verify(n, target, probabilities)
}
