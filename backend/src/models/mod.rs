//! Domain models for the evacuation calculator

pub mod flow;
pub mod segment;

// Re-exports
pub use flow::{clamp_density, FlowParams, BOUNDARY_DENSITY};
pub use segment::{resolve_path, PathType, Segment, SegmentSpec, DEFAULT_SEGMENT_WIDTH};
