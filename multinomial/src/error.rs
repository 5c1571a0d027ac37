use crate::statistics::validation::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("computation error: {0}")]
    Computation(String),
}

pub type Result<T> = std::result::Result<T, Error>;
