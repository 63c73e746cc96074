//! Calculation trace
//!
//! Every calculation produces a structured trace: a header naming the method
//! and the initial density, then one entry per segment (Method Q adds a
//! continuity note between segments). The trace renders to the human-readable
//! text reported alongside the verdict.
//!
//! # Example
//!
//! ```rust
//! use evacuation_core_rs::calculator::{CalculationLog, Method, TraceEntry};
//!
//! let mut log = CalculationLog::new();
//! log.log(TraceEntry::MethodSelected { method: Method::L });
//! assert_eq!(log.render(), "Method L Selected (N <= 50)");
//! ```

use super::options::Method;
use crate::models::{FlowParams, PathType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One line of the calculation trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "entry", rename_all = "snake_case")]
pub enum TraceEntry {
    /// Method chosen from the occupant count
    MethodSelected { method: Method },

    /// Density derived from occupant count and origin area
    InitialDensity {
        density: f64,
        occupant_count: u32,
        area: f64,
    },

    /// Method L segment: time = length / speed
    FreeFlowSegment {
        /// 1-based position along the path
        index: usize,
        path_type: PathType,
        length: f64,
        speed: f64,
        time: f64,
    },

    /// Method Q segment: time = max(throughput time, travel time)
    ThroughputSegment {
        index: usize,
        width: f64,
        length: f64,
        path_type: PathType,
        density: f64,
        q: f64,
        v: f64,
        throughput_time: f64,
        travel_time: f64,
        time: f64,
        /// Table-12 parameters when the segment is a narrow door
        narrow_door: Option<FlowParams>,
    },

    /// Flow handed from a Method Q segment to the next one
    Continuity {
        index: usize,
        /// Persons per minute leaving the segment (W·q)
        flow: f64,
        next_width: f64,
        /// Specific throughput the next width implies
        next_q: f64,
        /// Density adopted for the next segment; `None` when pinned
        next_density: Option<f64>,
    },
}

impl TraceEntry {
    /// Whether this entry describes a single segment
    pub fn is_segment(&self) -> bool {
        matches!(
            self,
            TraceEntry::FreeFlowSegment { .. } | TraceEntry::ThroughputSegment { .. }
        )
    }

    /// Time contributed by this entry (minutes)
    pub fn segment_time(&self) -> Option<f64> {
        match self {
            TraceEntry::FreeFlowSegment { time, .. } => Some(*time),
            TraceEntry::ThroughputSegment { time, .. } => Some(*time),
            _ => None,
        }
    }
}

impl fmt::Display for TraceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceEntry::MethodSelected { method: Method::L } => {
                write!(f, "Method L Selected (N <= 50)")
            }
            TraceEntry::MethodSelected { method: Method::Q } => {
                write!(f, "Method Q Selected (N > 50)")
            }
            TraceEntry::InitialDensity {
                density,
                occupant_count,
                area,
            } => write!(
                f,
                "Initial Density D = {:.2} (N={}, A={:.2})",
                density, occupant_count, area
            ),
            TraceEntry::FreeFlowSegment {
                index,
                path_type,
                length,
                speed,
                time,
            } => write!(
                f,
                "Seg {} ({}): L={:.2}m, v={:.2}m/min -> t={:.2} min",
                index, path_type, length, speed, time
            ),
            TraceEntry::ThroughputSegment {
                index,
                width,
                length,
                path_type,
                density,
                q,
                v,
                time,
                narrow_door,
                ..
            } => {
                write!(
                    f,
                    "Seg {}: W={:.2}m L={:.2}m Type={} D={:.2} -> q={:.2} v={:.2} -> T_calc={:.2} min",
                    index, width, length, path_type, density, q, v, time
                )?;
                if let Some(nd) = narrow_door {
                    write!(f, " [narrow door v={:.2} q={:.2}]", nd.v, nd.q)?;
                }
                Ok(())
            }
            TraceEntry::Continuity {
                index,
                flow,
                next_width,
                next_q,
                next_density,
            } => {
                write!(
                    f,
                    "  Seg {} -> {}: flow={:.2} p/min, W_next={:.2}m, q_next={:.2}",
                    index,
                    index + 1,
                    flow,
                    next_width,
                    next_q
                )?;
                match next_density {
                    Some(d) => write!(f, ", D_next={:.2}", d),
                    None => write!(f, " (density held)"),
                }
            }
        }
    }
}

/// Ordered trace of one calculation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculationLog {
    entries: Vec<TraceEntry>,
}

impl CalculationLog {
    /// Create a new empty trace
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append an entry
    pub fn log(&mut self, entry: TraceEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in order
    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    /// Entries describing segments
    pub fn segment_entries(&self) -> Vec<&TraceEntry> {
        self.entries.iter().filter(|e| e.is_segment()).collect()
    }

    /// Text form, one line per entry
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for CalculationLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
