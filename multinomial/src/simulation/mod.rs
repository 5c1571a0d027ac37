pub mod sampler;
pub mod verification;
