//! Calculator Module
//!
//! Density derivation, method selection and the two time-integration
//! algorithms (Method L and Method Q).
//!
//! See `engine.rs` for the implementation.

pub mod engine;
pub mod log;
pub mod options;

use crate::regulations::RegulationsError;
use thiserror::Error;

/// Errors that abort a calculation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CalculationError {
    #[error("Regulations error: {0}")]
    Regulations(#[from] RegulationsError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// Re-export main types for convenience
pub use engine::{CalculationResult, EvacuationCalculator};
pub use log::{CalculationLog, TraceEntry};
pub use options::{
    CalculationOptions, ContinuityMode, Method, METHOD_L_MAX_OCCUPANTS, MIN_SPEED, MIN_THROUGHPUT,
};
