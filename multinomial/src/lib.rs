pub mod error;
pub mod experiment;
pub mod list_parser;
pub mod simulation;
pub mod statistics;

pub mod prelude {
    pub use crate::{
        error::Error,
        experiment::{Experiment, Frequencies},
        list_parser::{parse_categories, parse_frequencies, parse_probabilities},
        simulation::{
            sampler::{CumulativeTable, sample_one_trial, simulate_trial},
            verification::{
                Concordance, VerificationResults, Verifier, simulation_count,
                verify_by_simulation,
            },
        },
        statistics::{
            interpretation::{Interpretation, OneIn, Rarity},
            pmf::{
                DensityBreakdown, PowerTerm, density_breakdown, expected_frequencies, factorial,
                multinomial_coefficient, multinomial_density, power,
            },
            roller::Roller,
            validation::{ValidationError, validate},
        },
    };
}
