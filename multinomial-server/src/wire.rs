//! JSON request and response bodies.
//!
//! Requests take `trialCount`, `categories`, `probabilities` and
//! `frecuencias_deseadas`, and accept the Spanish names (`n_experimentos`,
//! `categorias`, ...) as aliases. Responses use the snake_case Spanish keys
//! the bundled web frontend reads; enum values (rarity, concordance) stay in
//! English.

use multinomial::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct ExperimentRequest {
    #[serde(rename = "trialCount", alias = "n_experimentos")]
    pub trial_count: u64,
    #[serde(alias = "categorias")]
    pub categories: Vec<String>,
    #[serde(alias = "probabilidades")]
    pub probabilities: Vec<f64>,
}

impl ExperimentRequest {
    pub fn into_experiment(self) -> Result<Experiment, ValidationError> {
        Experiment::new(self.trial_count, self.categories, self.probabilities)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutcomeRequest {
    #[serde(flatten)]
    pub experiment: ExperimentRequest,
    #[serde(rename = "frecuencias_deseadas", alias = "targetFrequencies")]
    pub target_frequencies: Vec<i64>,
}

impl OutcomeRequest {
    pub fn into_parts(self) -> Result<(Experiment, Frequencies), ValidationError> {
        let experiment = self.experiment.into_experiment()?;
        let target = experiment.outcome(&self.target_frequencies)?;
        Ok((experiment, target))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MultinomialResponse {
    #[serde(rename = "categorias")]
    pub categories: Vec<String>,
    #[serde(rename = "frecuencias_observadas")]
    pub observed_frequencies: Frequencies,
    #[serde(rename = "frecuencias_esperadas")]
    pub expected_frequencies: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TermDetail {
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "termino")]
    pub term: String,
    #[serde(rename = "valor")]
    pub value: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct InterpretationBody {
    #[serde(rename = "porcentaje")]
    pub percentage: f64,
    #[serde(rename = "uno_en")]
    pub one_in: OneIn,
    #[serde(rename = "rareza")]
    pub rarity: Rarity,
    #[serde(rename = "anos_si_diario")]
    pub years_if_daily: u64,
}

impl From<Interpretation> for InterpretationBody {
    fn from(interpretation: Interpretation) -> Self {
        Self {
            percentage: interpretation.percentage,
            one_in: interpretation.one_in,
            rarity: interpretation.rarity,
            years_if_daily: interpretation.years_if_daily,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProbabilityResponse {
    #[serde(rename = "categorias")]
    pub categories: Vec<String>,
    #[serde(rename = "frecuencias_deseadas")]
    pub target_frequencies: Frequencies,
    #[serde(rename = "frecuencias_esperadas")]
    pub expected_frequencies: Vec<f64>,
    #[serde(rename = "probabilidad_exacta")]
    pub exact_probability: f64,
    #[serde(rename = "coeficiente_multinomial")]
    pub multinomial_coefficient: f64,
    #[serde(rename = "producto_probabilidades")]
    pub product_of_probabilities: f64,
    #[serde(rename = "detalles_calculo")]
    pub terms: Vec<TermDetail>,
    #[serde(rename = "interpretacion")]
    pub interpretation: InterpretationBody,
}

impl ProbabilityResponse {
    pub fn new(experiment: &Experiment, target: Frequencies, breakdown: DensityBreakdown) -> Self {
        let terms = experiment
            .categories()
            .iter()
            .zip(breakdown.terms.iter())
            .map(|(category, term)| TermDetail {
                category: category.clone(),
                term: term.label(),
                value: term.value,
            })
            .collect();
        Self {
            categories: experiment.categories().to_vec(),
            target_frequencies: target,
            expected_frequencies: experiment.expected_frequencies(),
            exact_probability: breakdown.density,
            multinomial_coefficient: breakdown.coefficient,
            product_of_probabilities: breakdown.product,
            terms,
            interpretation: Interpretation::from_density(breakdown.density).into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationBody {
    #[serde(rename = "num_simulaciones")]
    pub simulations: u64,
    #[serde(rename = "simulaciones_planificadas")]
    pub planned_simulations: u64,
    #[serde(rename = "exitos_encontrados")]
    pub successes: u64,
    #[serde(rename = "probabilidad_simulada")]
    pub empirical_probability: f64,
    #[serde(rename = "probabilidad_teorica")]
    pub exact_probability: f64,
    #[serde(rename = "error_absoluto")]
    pub absolute_deviation: f64,
    #[serde(rename = "error_porcentual")]
    pub relative_deviation: f64,
    #[serde(rename = "concordancia")]
    pub concordance: Concordance,
    #[serde(rename = "truncada")]
    pub truncated: bool,
    #[serde(rename = "tiempo_ms")]
    pub elapsed_ms: i64,
}

impl From<VerificationResults> for SimulationBody {
    fn from(results: VerificationResults) -> Self {
        Self {
            simulations: results.simulations,
            planned_simulations: results.planned_simulations,
            successes: results.successes,
            empirical_probability: results.empirical_probability,
            exact_probability: results.exact_probability,
            absolute_deviation: results.absolute_deviation,
            relative_deviation: results.relative_deviation,
            concordance: results.concordance,
            truncated: results.truncated,
            elapsed_ms: results.elapsed_ms,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VerificationResponse {
    #[serde(rename = "simulacion")]
    pub simulation: SimulationBody,
    #[serde(rename = "mensaje")]
    pub message: String,
}

impl From<VerificationResults> for VerificationResponse {
    fn from(results: VerificationResults) -> Self {
        let message = match results.concordance {
            _ if results.simulations == 0 => {
                "No simulations were run; nothing to compare".to_string()
            }
            Concordance::NotApplicable => format!(
                "The target outcome is impossible; {} of {} simulated experiments matched it",
                results.successes, results.simulations
            ),
            Concordance::Fair => format!(
                "{} of {} simulated experiments matched the target ({:.2}% deviation); consider more simulations",
                results.successes, results.simulations, results.relative_deviation
            ),
            concordance => format!(
                "{} of {} simulated experiments matched the target ({:.2}% deviation, {} concordance)",
                results.successes, results.simulations, results.relative_deviation, concordance
            ),
        };
        Self {
            simulation: results.into(),
            message,
        }
    }
}
