//! Axum HTTP server: stateless JSON endpoints over the multinomial library.
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/info` | Formula, parameter glossary and endpoint directory |
//! | POST | `/multinomial` | One simulated experiment plus expected frequencies |
//! | POST | `/calcular-probabilidad` | Exact probability of a target outcome |
//! | POST | `/simular-verificacion` | Monte Carlo check of that probability |
//!
//! Every failure, including an unreadable body, is answered with status 200
//! and a `{"error": "..."}` payload. Sampling and density work runs on the
//! blocking pool.

use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use multinomial::prelude::*;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};

use crate::{
    config::ServerConfig,
    wire::{
        ExperimentRequest, MultinomialResponse, OutcomeRequest, ProbabilityResponse,
        VerificationResponse,
    },
};

pub struct AppState {
    pub config: ServerConfig,
    root_roller: Option<Mutex<Roller>>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let root_roller = config.seed.map(|seed| Mutex::new(Roller::from_seed(seed)));
        Self {
            config,
            root_roller,
        }
    }

    /// A generator owned by one request. With a seed configured, generators
    /// are forked in request order from a single seeded root.
    pub fn roller(&self) -> Roller {
        match &self.root_roller {
            Some(root) => match root.lock() {
                Ok(mut root) => root.fork(),
                Err(_) => Roller::new(),
            },
            None => Roller::new(),
        }
    }

    pub fn verifier(&self) -> Verifier {
        let verifier =
            Verifier::new(self.roller()).with_max_simulations(self.config.max_simulations);
        match self.config.deadline() {
            Some(deadline) => verifier.with_deadline(deadline),
            None => verifier,
        }
    }
}

pub type SharedState = Arc<AppState>;

pub fn create_router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let static_dir = state.config.static_dir.clone();

    let router = Router::new()
        .route("/health", get(handle_health_check))
        .route("/info", get(handle_info))
        .route("/multinomial", post(handle_multinomial))
        .route("/calcular-probabilidad", post(handle_probability))
        .route("/simular-verificacion", post(handle_verification))
        .layer(cors)
        .with_state(state);

    match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    }
}

// ── Errors ──────────────────────────────────────────────────────────

/// An error reported to the client as `{"error": message}` with status 200.
#[derive(Debug)]
pub struct ApiError(pub String);

impl ApiError {
    fn computation(detail: impl std::fmt::Display) -> Self {
        ApiError(format!("Computation error: {detail}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            Json(serde_json::json!({ "error": self.0 })),
        )
            .into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError(err.to_string())
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::Validation(err) => err.into(),
            Error::Computation(detail) => ApiError::computation(detail),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(rejection.body_text())
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

// ── GET handlers ────────────────────────────────────────────────────

async fn handle_health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "OK" }))
}

async fn handle_info() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "description": "Multinomial distribution: exact probabilities, expected frequencies and Monte Carlo verification",
        "formula": "P(X1=x1, ..., Xk=xk) = n! / (x1! * ... * xk!) * p1^x1 * ... * pk^xk",
        "parameters": {
            "trialCount": "n, number of independent trials per experiment",
            "categories": "k category labels",
            "probabilities": "k probabilities, each greater than 0, summing to 1 (tolerance 0.01)",
            "frecuencias_deseadas": "k non-negative target counts summing to n",
        },
        "endpoints": {
            "POST /multinomial": "simulate one experiment and return observed and expected frequencies",
            "POST /calcular-probabilidad": "exact probability of the target frequencies with a step-by-step breakdown",
            "POST /simular-verificacion": "compare the exact probability with a Monte Carlo estimate",
            "GET /info": "this document",
            "GET /health": "health check",
        },
    }))
}

// ── POST handlers ───────────────────────────────────────────────────

async fn handle_multinomial(
    State(state): State<SharedState>,
    payload: Result<Json<ExperimentRequest>, JsonRejection>,
) -> ApiResult<MultinomialResponse> {
    let Json(request) = payload?;
    let experiment = request.into_experiment()?;
    let mut roller = state.roller();

    let response = tokio::task::spawn_blocking(move || {
        let observed = experiment.sample(&mut roller);
        log::debug!(
            "Sampled {:?} from {} trials",
            observed.as_slice(),
            experiment.trials()
        );
        MultinomialResponse {
            categories: experiment.categories().to_vec(),
            observed_frequencies: observed,
            expected_frequencies: experiment.expected_frequencies(),
        }
    })
    .await
    .map_err(ApiError::computation)?;

    Ok(Json(response))
}

async fn handle_probability(
    payload: Result<Json<OutcomeRequest>, JsonRejection>,
) -> ApiResult<ProbabilityResponse> {
    let Json(request) = payload?;
    let (experiment, target) = request.into_parts()?;

    let response = tokio::task::spawn_blocking(move || -> Result<_, Error> {
        let breakdown = experiment.density(&target)?;
        log::debug!(
            "P({:?}) = {:.8e} over {} trials",
            target.as_slice(),
            breakdown.density,
            experiment.trials()
        );
        Ok(ProbabilityResponse::new(&experiment, target, breakdown))
    })
    .await
    .map_err(ApiError::computation)??;

    Ok(Json(response))
}

async fn handle_verification(
    State(state): State<SharedState>,
    payload: Result<Json<OutcomeRequest>, JsonRejection>,
) -> ApiResult<VerificationResponse> {
    let Json(request) = payload?;
    let (experiment, target) = request.into_parts()?;
    let mut verifier = state.verifier();

    let results = tokio::task::spawn_blocking(move || verifier.run(&experiment, &target))
        .await
        .map_err(ApiError::computation)??;
    if results.truncated {
        log::warn!(
            "Verification truncated after {} of {} simulations",
            results.simulations,
            results.planned_simulations
        );
    }

    Ok(Json(results.into()))
}
