//! Evacuation Calculator Engine
//!
//! Integrates evacuation time along an ordered path of segments:
//!
//! ```text
//! occupants, origin area ──► density D = N / A (≤ 9.2)
//!                                │
//!                   N ≤ 50 ──────┴────── N > 50
//!                     │                    │
//!                  Method L             Method Q
//!          Σ L_i / v(D, type_i)   Σ max(N / (W_i·q_i), L_i / v_i)
//! ```
//!
//! Each segment queries the regulations loader for `(v, q)`. Any table error
//! aborts the calculation; there is no partial result. Numeric degeneracies
//! (zero area, zero speed, zero throughput) are floored, never raised.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use evacuation_core_rs::{EvacuationCalculator, PathType, RegulationsLoader, Segment};
//! use evacuation_core_rs::calculator::Method;
//!
//! let calc = EvacuationCalculator::new(Arc::new(RegulationsLoader::bundled()));
//! let path = vec![Segment::new(10.0, PathType::Horizontal)];
//!
//! let result = calc.calculate(&path, 10, 100.0).unwrap();
//! assert_eq!(result.method, Method::L);
//! assert!((result.total_time - 0.1).abs() < 1e-12);
//! ```

use super::log::{CalculationLog, TraceEntry};
use super::options::{CalculationOptions, ContinuityMode, Method, MIN_SPEED, MIN_THROUGHPUT};
use super::CalculationError;
use crate::models::{clamp_density, FlowParams, PathType, Segment, BOUNDARY_DENSITY};
use crate::regulations::{RegulationsLoader, NARROW_DOOR_MAX_WIDTH, NARROW_DOOR_MIN_WIDTH};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Outcome of one calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Method applied
    pub method: Method,

    /// Density at the origin (persons/m²)
    pub initial_density: f64,

    /// Required evacuation time (minutes)
    pub total_time: f64,

    /// Structured trace
    pub log: CalculationLog,
}

/// Evacuation-time calculator
///
/// Holds no state beyond the shared tables and its options, so one instance
/// can serve any number of calculations.
#[derive(Debug, Clone)]
pub struct EvacuationCalculator {
    reg: Arc<RegulationsLoader>,
    options: CalculationOptions,
}

impl EvacuationCalculator {
    /// Create a calculator with default options
    pub fn new(reg: Arc<RegulationsLoader>) -> Self {
        Self {
            reg,
            options: CalculationOptions::default(),
        }
    }

    /// Replace the calculation options
    pub fn with_options(mut self, options: CalculationOptions) -> Self {
        self.options = options;
        self
    }

    /// Occupant density at the origin
    ///
    /// `D = N / A`, clamped to the boundary density. A non-positive area is
    /// treated as maximal crowding.
    ///
    /// # Example
    /// ```
    /// use std::sync::Arc;
    /// use evacuation_core_rs::{EvacuationCalculator, RegulationsLoader};
    ///
    /// let calc = EvacuationCalculator::new(Arc::new(RegulationsLoader::empty()));
    /// assert!((calc.density(10, 100.0) - 0.1).abs() < 1e-12);
    /// assert_eq!(calc.density(1000, 10.0), 9.2);
    /// assert_eq!(calc.density(5, 0.0), 9.2);
    /// ```
    pub fn density(&self, occupant_count: u32, area: f64) -> f64 {
        if area <= 0.0 || area.is_nan() {
            return BOUNDARY_DENSITY;
        }
        clamp_density(occupant_count as f64 / area)
    }

    /// Method for an occupant count (N ≤ 50 → L, otherwise Q)
    pub fn select_method(&self, occupant_count: u32) -> Method {
        Method::for_occupants(occupant_count)
    }

    /// Required evacuation time along `segments`
    ///
    /// # Errors
    ///
    /// Returns `CalculationError::Regulations` if a table lookup fails; no
    /// partial total is produced.
    pub fn calculate(
        &self,
        segments: &[Segment],
        occupant_count: u32,
        origin_area: f64,
    ) -> Result<CalculationResult, CalculationError> {
        let method = self.select_method(occupant_count);
        let initial_density = self.density(occupant_count, origin_area);

        let mut log = CalculationLog::new();
        log.log(TraceEntry::MethodSelected { method });
        log.log(TraceEntry::InitialDensity {
            density: initial_density,
            occupant_count,
            area: origin_area,
        });

        let total_time = match method {
            Method::L => self.method_l(segments, initial_density, &mut log)?,
            Method::Q => self.method_q(segments, occupant_count, initial_density, &mut log)?,
        };

        tracing::info!(
            %method,
            occupant_count,
            initial_density,
            segments = segments.len(),
            total_time,
            "evacuation time calculated"
        );

        Ok(CalculationResult {
            method,
            initial_density,
            total_time,
            log,
        })
    }

    // ========================================================================
    // Method L
    // ========================================================================

    /// Free-flow integration: density fixed, time = Σ length / speed
    fn method_l(
        &self,
        segments: &[Segment],
        density: f64,
        log: &mut CalculationLog,
    ) -> Result<f64, CalculationError> {
        let mut total_time = 0.0;

        for (i, seg) in segments.iter().enumerate() {
            let params = self.reg.flow_params(density, seg.path_type)?;
            let speed = floor_speed(params.v);

            let time = seg.length / speed;
            total_time += time;

            tracing::debug!(
                index = i + 1,
                path_type = %seg.path_type,
                length = seg.length,
                speed,
                time,
                "method L segment"
            );

            log.log(TraceEntry::FreeFlowSegment {
                index: i + 1,
                path_type: seg.path_type,
                length: seg.length,
                speed,
                time,
            });
        }

        Ok(total_time)
    }

    // ========================================================================
    // Method Q
    // ========================================================================

    /// Throughput-limited integration: each segment takes the longer of the
    /// time for the whole group to pass its width and the time to walk it
    fn method_q(
        &self,
        segments: &[Segment],
        occupant_count: u32,
        initial_density: f64,
        log: &mut CalculationLog,
    ) -> Result<f64, CalculationError> {
        let n = occupant_count as f64;
        let mut density = initial_density;
        let mut total_time = 0.0;

        for (i, seg) in segments.iter().enumerate() {
            let table = self.reg.flow_params(density, seg.path_type)?;
            let narrow_door = self.narrow_door_check(seg)?;

            let q = match narrow_door {
                Some(nd) if self.options.narrow_door_bottleneck => table.q.min(nd.q),
                _ => table.q,
            };
            let v = floor_speed(table.v);

            let mut throughput = seg.width * q;
            if throughput <= 0.0 {
                throughput = MIN_THROUGHPUT;
            }
            let throughput_time = n / throughput;
            let travel_time = seg.length / v;
            let time = throughput_time.max(travel_time);

            total_time += time;

            tracing::debug!(
                index = i + 1,
                path_type = %seg.path_type,
                width = seg.width,
                density,
                q,
                v,
                throughput_time,
                travel_time,
                "method Q segment"
            );

            log.log(TraceEntry::ThroughputSegment {
                index: i + 1,
                width: seg.width,
                length: seg.length,
                path_type: seg.path_type,
                density,
                q,
                v,
                throughput_time,
                travel_time,
                time,
                narrow_door,
            });

            if let Some(next) = segments.get(i + 1) {
                let flow = seg.width * q;
                let next_q = flow / next.width;

                let next_density = match self.options.continuity {
                    ContinuityMode::PinnedDensity => None,
                    ContinuityMode::WidthContinuity => {
                        let d = self.reg.density_for_throughput(next_q, next.path_type)?;
                        Some(clamp_density(d))
                    }
                };

                log.log(TraceEntry::Continuity {
                    index: i + 1,
                    flow,
                    next_width: next.width,
                    next_q,
                    next_density,
                });

                if let Some(d) = next_density {
                    density = d;
                }
            }
        }

        Ok(total_time)
    }

    /// Table-12 parameters of a narrow door segment
    ///
    /// Only load-bearing when the bottleneck option is on; otherwise a
    /// missing Table 12 leaves the check empty instead of failing.
    fn narrow_door_check(&self, seg: &Segment) -> Result<Option<FlowParams>, CalculationError> {
        let is_narrow = seg.path_type == PathType::Door
            && seg.width >= NARROW_DOOR_MIN_WIDTH
            && seg.width < NARROW_DOOR_MAX_WIDTH;
        if !is_narrow {
            return Ok(None);
        }

        match self.reg.narrow_door_params(seg.width) {
            Ok(params) => Ok(Some(params)),
            Err(e) if self.options.narrow_door_bottleneck => Err(e.into()),
            Err(_) => Ok(None),
        }
    }
}

fn floor_speed(v: f64) -> f64 {
    if v <= 0.0 {
        MIN_SPEED
    } else {
        v
    }
}
