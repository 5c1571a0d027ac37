pub mod interpretation;
pub mod pmf;
pub mod roller;
pub mod validation;
