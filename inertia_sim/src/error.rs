//! Error types for the simulator core

use thiserror::Error;

/// Recoverable failures surfaced by the simulator
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// Text from the add-mass dialog that is not a finite number.
    #[error("invalid {field}: {value:?} is not a number")]
    InvalidInput { field: &'static str, value: String },

    /// A parsed mass that is zero or negative.
    #[error("mass must be positive, got {0}")]
    NonPositiveMass(f64),

    /// Angular acceleration requested while the moment of inertia is zero.
    #[error("moment of inertia is zero; angular acceleration is undefined")]
    ZeroInertia,
}

pub type SimResult<T> = Result<T, SimError>;
