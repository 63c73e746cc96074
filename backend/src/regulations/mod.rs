//! Regulations Module
//!
//! Regulatory reference data of Ordinance Iz-1971, Annex 8a, and the pure
//! lookup/interpolation queries over it.
//!
//! # Example
//!
//! ```rust
//! use evacuation_core_rs::regulations::RegulationsLoader;
//! use evacuation_core_rs::PathType;
//!
//! let reg = RegulationsLoader::bundled();
//!
//! // D = 0.6 is not tabulated: the next higher row (D = 1.0) applies
//! let params = reg.flow_params(0.6, PathType::Horizontal).unwrap();
//! assert_eq!(params.q, 80.1);
//! ```

pub mod loader;
pub mod tables;

use thiserror::Error;

/// Errors raised by the regulatory tables
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RegulationsError {
    #[error("Unknown path type: {0}")]
    UnknownPathType(String),

    #[error("Regulatory data unavailable: {0}")]
    DataLoadFailure(String),

    #[error("Regulatory table {0} has no rows")]
    EmptyTable(&'static str),
}

// Re-export public API
pub use loader::{
    PermissibleTime, RegulationsLoader, NARROW_DOOR_MAX_WIDTH, NARROW_DOOR_MIN_WIDTH,
};
pub use tables::{FlowTableRow, NarrowDoorRow, PermissibleEntry, RegulationData};
