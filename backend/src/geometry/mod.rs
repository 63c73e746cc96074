//! Path leg classification
//!
//! Turns measured path legs into calculator segments. A leg is described by
//! its 3-D length and the elevation change between its ends; anything
//! steeper than 5° counts as a staircase, with the sign of the elevation
//! change giving the direction. Width is not derivable from the measurement
//! and defaults to 1.0 m.

use crate::models::{PathType, Segment, DEFAULT_SEGMENT_WIDTH};
use serde::{Deserialize, Serialize};

/// Slope above which a leg is treated as a staircase (degrees)
pub const STAIR_SLOPE_THRESHOLD_DEG: f64 = 5.0;

/// Smallest plan length used in the slope computation (meters)
const MIN_PLAN_LENGTH: f64 = 0.001;

/// Classify a leg from its 3-D length and elevation change
///
/// # Example
/// ```
/// use evacuation_core_rs::geometry::classify_leg;
/// use evacuation_core_rs::PathType;
///
/// assert_eq!(classify_leg(10.0, 0.2), PathType::Horizontal);
/// assert_eq!(classify_leg(5.0, -3.0), PathType::StairDown);
/// assert_eq!(classify_leg(5.0, 3.0), PathType::StairUp);
/// ```
pub fn classify_leg(length_3d: f64, rise: f64) -> PathType {
    let plan = (length_3d * length_3d - rise * rise).max(0.0).sqrt();
    let plan = plan.max(MIN_PLAN_LENGTH);

    let slope_deg = rise.abs().atan2(plan).to_degrees();

    if slope_deg < STAIR_SLOPE_THRESHOLD_DEG {
        PathType::Horizontal
    } else if rise < 0.0 {
        PathType::StairDown
    } else {
        PathType::StairUp
    }
}

/// Measured leg of a path
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathLeg {
    /// Length along the leg (meters)
    pub length_3d: f64,

    /// Elevation change from start to end (meters, negative = down)
    pub rise: f64,

    /// Passage width, when known (meters)
    #[serde(default)]
    pub width: Option<f64>,
}

impl PathLeg {
    pub fn to_segment(&self) -> Segment {
        Segment {
            length: self.length_3d,
            path_type: classify_leg(self.length_3d, self.rise),
            width: self.width.unwrap_or(DEFAULT_SEGMENT_WIDTH),
        }
    }
}

/// Convert measured legs to segments, in order
pub fn segments_from_legs(legs: &[PathLeg]) -> Vec<Segment> {
    legs.iter().map(PathLeg::to_segment).collect()
}
