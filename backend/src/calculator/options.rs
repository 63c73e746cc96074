//! Calculation method and options
//!
//! The regulation fixes the method threshold and the numeric floors; they are
//! constants here. The two behaviors whose regulatory intent is unsettled are
//! exposed as named options that default to the established behavior.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest occupant count evaluated with Method L
pub const METHOD_L_MAX_OCCUPANTS: u32 = 50;

/// Speed floor applied when a table yields a non-positive speed (m/min)
pub const MIN_SPEED: f64 = 0.1;

/// Throughput floor applied when width × q is non-positive (persons/min)
pub const MIN_THROUGHPUT: f64 = 0.1;

/// Evacuation-time method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Method {
    /// Free flow, at most 50 occupants: density fixed, time = Σ L / v
    #[serde(rename = "method_l")]
    L,

    /// Throughput limited, more than 50 occupants: per segment
    /// max(N / (W·q), L / v)
    #[serde(rename = "method_q")]
    Q,
}

impl Method {
    /// Method for an occupant count
    pub fn for_occupants(occupant_count: u32) -> Self {
        if occupant_count <= METHOD_L_MAX_OCCUPANTS {
            Method::L
        } else {
            Method::Q
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::L => write!(f, "Method L"),
            Method::Q => write!(f, "Method Q"),
        }
    }
}

/// How Method Q carries density from one segment to the next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContinuityMode {
    /// Density stays at the starting value for the whole path.
    ///
    /// The flow continuity figures are still computed and traced.
    #[default]
    PinnedDensity,

    /// Density of the next segment is re-derived from flow continuity:
    /// `q_next = W·q / W_next`, mapped back through Table 11.
    WidthContinuity,
}

/// Options of a calculation
///
/// # Example
/// ```
/// use evacuation_core_rs::calculator::{CalculationOptions, ContinuityMode};
///
/// let opts = CalculationOptions::default();
/// assert_eq!(opts.continuity, ContinuityMode::PinnedDensity);
/// assert!(!opts.narrow_door_bottleneck);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculationOptions {
    /// Density propagation between Method Q segments
    pub continuity: ContinuityMode,

    /// Let Table 12 cap the throughput of narrow doors in Method Q.
    ///
    /// When off, narrow-door parameters are fetched and traced only.
    pub narrow_door_bottleneck: bool,
}
