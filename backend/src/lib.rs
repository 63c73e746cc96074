//! Evacuation Core - Rust Engine
//!
//! Required building-evacuation time under Ordinance Iz-1971, Annex 8a, and
//! the pass/fail comparison against the permissible time.
//!
//! # Architecture
//!
//! - **models**: Domain types (Segment, PathType, FlowParams)
//! - **regulations**: Regulatory tables and lookups (Tables 11 and 12, limits)
//! - **calculator**: Density, method selection, Method L / Method Q integration
//! - **compliance**: Request in, report out (verdict against permissible time)
//! - **geometry**: Slope classification of measured path legs
//!
//! # Critical Invariants
//!
//! 1. Densities are clamped to the boundary density 9.2 persons/m²
//! 2. Table 11 is read with the "next higher tabulated density" rule
//! 3. Calculations are deterministic and keep no state between calls
//! 4. Regulatory tables are immutable after loading

// Module declarations
pub mod calculator;
pub mod compliance;
pub mod geometry;
pub mod models;
pub mod regulations;

// Re-exports for convenience
pub use calculator::{
    CalculationError, CalculationLog, CalculationOptions, CalculationResult, ContinuityMode,
    EvacuationCalculator, Method, TraceEntry,
};
pub use compliance::{ComplianceReport, EvacuationRequest, Verdict};
pub use models::{FlowParams, PathType, Segment, SegmentSpec, BOUNDARY_DENSITY};
pub use regulations::{PermissibleTime, RegulationsError, RegulationsLoader};

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn evacuation_core_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::calculator::PyEvacuationCalculator>()?;
    Ok(())
}
