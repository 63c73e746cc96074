//! Flow parameters and occupant density
//!
//! The regulation describes crowd movement by two numbers per density and
//! path type: free speed `v` (m/min) and specific throughput `q`
//! (persons per meter of width per minute).

use serde::{Deserialize, Serialize};

/// Physiological maximum density assumed by the regulation (persons/m²)
pub const BOUNDARY_DENSITY: f64 = 9.2;

/// Speed and specific throughput for one density and path type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowParams {
    /// Movement speed (m/min)
    pub v: f64,

    /// Specific throughput (persons/(m·min))
    pub q: f64,
}

impl FlowParams {
    /// Interpolate `v` and `q` independently at `ratio` between `self` and `upper`
    pub(crate) fn lerp(&self, upper: &FlowParams, ratio: f64) -> FlowParams {
        FlowParams {
            v: self.v + (upper.v - self.v) * ratio,
            q: self.q + (upper.q - self.q) * ratio,
        }
    }
}

/// Clamp a density to the boundary density
///
/// Negative inputs are lifted to zero so every density handed to a table
/// lookup lies in `[0, BOUNDARY_DENSITY]`.
pub fn clamp_density(density: f64) -> f64 {
    if density.is_nan() {
        return BOUNDARY_DENSITY;
    }
    density.clamp(0.0, BOUNDARY_DENSITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_density_bounds() {
        assert_eq!(clamp_density(-1.0), 0.0);
        assert_eq!(clamp_density(3.5), 3.5);
        assert_eq!(clamp_density(100.0), BOUNDARY_DENSITY);
        assert_eq!(clamp_density(f64::INFINITY), BOUNDARY_DENSITY);
    }

    #[test]
    fn test_lerp_midpoint() {
        let lo = FlowParams { v: 10.0, q: 100.0 };
        let hi = FlowParams { v: 20.0, q: 80.0 };
        let mid = lo.lerp(&hi, 0.5);
        assert!((mid.v - 15.0).abs() < 1e-12);
        assert!((mid.q - 90.0).abs() < 1e-12);
    }
}
