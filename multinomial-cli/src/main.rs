use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use multinomial::prelude::*;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Random seed for reproducibility
    #[arg(long, global = true, default_value = None)]
    seed: Option<u64>,

    /// Output file path (pretty JSON); printed to stdout when omitted
    #[arg(short, long, global = true, value_name = "FILE")]
    output: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one multinomial experiment and compare it with the expected frequencies
    Sample {
        #[command(flatten)]
        experiment: ExperimentArgs,
    },
    /// Exact probability of a target outcome
    Density {
        #[command(flatten)]
        experiment: ExperimentArgs,

        /// Target frequencies, e.g. "3,0,0"
        #[arg(short, long, allow_hyphen_values = true)]
        frequencies: String,
    },
    /// Check the exact probability of a target outcome by simulation
    Verify {
        #[command(flatten)]
        experiment: ExperimentArgs,

        /// Target frequencies, e.g. "3,0,0"
        #[arg(short, long, allow_hyphen_values = true)]
        frequencies: String,

        /// Upper bound on the number of simulated experiments
        #[arg(long, default_value_t = multinomial::simulation::verification::MAX_SIMULATIONS)]
        max_simulations: u64,

        /// Stop simulating after this many milliseconds
        #[arg(long)]
        deadline_ms: Option<i64>,
    },
}

#[derive(clap::Args, Debug)]
struct ExperimentArgs {
    /// Number of trials per experiment
    #[arg(short = 'n', long)]
    trials: u64,

    /// Category labels, e.g. "Red,Green,Blue"
    #[arg(short, long)]
    categories: String,

    /// Category probabilities, e.g. "0.5,0.3,0.2"
    #[arg(short, long)]
    probabilities: String,
}

impl ExperimentArgs {
    fn build(&self) -> anyhow::Result<Experiment> {
        let categories = parse_categories(&self.categories)?;
        let probabilities = parse_probabilities(&self.probabilities)?;
        Ok(Experiment::new(self.trials, categories, probabilities)?)
    }
}

#[derive(Serialize)]
struct SampleReport<'a> {
    categories: &'a [String],
    observed_frequencies: Frequencies,
    expected_frequencies: Vec<f64>,
}

#[derive(Serialize)]
struct DensityReport<'a> {
    categories: &'a [String],
    target_frequencies: &'a Frequencies,
    expected_frequencies: Vec<f64>,
    breakdown: DensityBreakdown,
    interpretation: Interpretation,
}

fn write_report(report: &impl Serialize, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            let file = std::fs::File::create(path)?;
            let writer = std::io::BufWriter::new(file);
            serde_json::to_writer_pretty(writer, report)?;
            log::info!("Results written to {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(report)?),
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::builder()
        .format_timestamp_secs()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
    log::debug!("Starting with args: {:?}", args);

    let mut roller = match args.seed {
        Some(seed) => Roller::from_seed(seed),
        None => Roller::new(),
    };
    let output = args.output.as_deref();

    match &args.command {
        Command::Sample { experiment } => {
            let experiment = experiment.build()?;
            let observed = experiment.sample(&mut roller);
            write_report(
                &SampleReport {
                    categories: experiment.categories(),
                    observed_frequencies: observed,
                    expected_frequencies: experiment.expected_frequencies(),
                },
                output,
            )
        }
        Command::Density {
            experiment,
            frequencies,
        } => {
            let experiment = experiment.build()?;
            let target = experiment.outcome(&parse_frequencies(frequencies)?)?;
            let breakdown = experiment.density(&target)?;
            let interpretation = Interpretation::from_density(breakdown.density);
            log::info!(
                "P = {:.8e} ({}, {})",
                breakdown.density,
                interpretation.rarity,
                interpretation.one_in
            );
            write_report(
                &DensityReport {
                    categories: experiment.categories(),
                    target_frequencies: &target,
                    expected_frequencies: experiment.expected_frequencies(),
                    breakdown,
                    interpretation,
                },
                output,
            )
        }
        Command::Verify {
            experiment,
            frequencies,
            max_simulations,
            deadline_ms,
        } => {
            let experiment = experiment.build()?;
            let target = experiment.outcome(&parse_frequencies(frequencies)?)?;
            let mut verifier = Verifier::new(roller.fork()).with_max_simulations(*max_simulations);
            if let Some(ms) = deadline_ms {
                verifier = verifier.with_deadline(chrono::Duration::milliseconds(*ms));
            }
            log::info!("Running verification for {:?}...", target.as_slice());
            let results = verifier.run(&experiment, &target)?;
            results.print_summary();
            write_report(&results, output)
        }
    }
}
