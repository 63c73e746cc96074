//! Path segment model
//!
//! One homogeneous leg of an evacuation path. Each segment has:
//! - Length along the direction of travel (meters)
//! - Path type (horizontal, stair down, stair up, door)
//! - Clear passage width (meters)
//!
//! Segments arrive in travel order and are treated as immutable input by the
//! calculator.

use crate::regulations::RegulationsError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Width assumed for a segment when none is supplied (meters)
pub const DEFAULT_SEGMENT_WIDTH: f64 = 1.0;

/// Kind of path a segment represents
///
/// Each variant maps to exactly one column of the flow-parameter table.
/// Parsing from text is strict: anything other than the four recognized
/// spellings is an `UnknownPathType` error.
///
/// # Example
/// ```
/// use evacuation_core_rs::PathType;
///
/// let ty: PathType = "stair_down".parse().unwrap();
/// assert_eq!(ty, PathType::StairDown);
/// assert!("ramp".parse::<PathType>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum PathType {
    /// Level corridor or room floor
    Horizontal,

    /// Staircase travelled downwards
    StairDown,

    /// Staircase travelled upwards
    StairUp,

    /// Doorway
    Door,
}

impl PathType {
    /// All path types, in table column order
    pub const ALL: [PathType; 4] = [
        PathType::Horizontal,
        PathType::StairDown,
        PathType::StairUp,
        PathType::Door,
    ];

    /// Input spelling of this path type
    pub fn as_str(&self) -> &'static str {
        match self {
            PathType::Horizontal => "horizontal",
            PathType::StairDown => "stair_down",
            PathType::StairUp => "stair_up",
            PathType::Door => "door",
        }
    }

    /// Key used for this path type in the `limits` section of the data file
    pub fn limits_key(&self) -> &'static str {
        match self {
            PathType::Horizontal => "horizontal",
            PathType::StairDown => "stairs_down",
            PathType::StairUp => "stairs_up",
            PathType::Door => "doors",
        }
    }
}

impl fmt::Display for PathType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PathType {
    type Err = RegulationsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "horizontal" => Ok(PathType::Horizontal),
            "stair_down" => Ok(PathType::StairDown),
            "stair_up" => Ok(PathType::StairUp),
            "door" => Ok(PathType::Door),
            other => Err(RegulationsError::UnknownPathType(other.to_string())),
        }
    }
}

impl TryFrom<String> for PathType {
    type Error = RegulationsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// One leg of an evacuation path
///
/// # Example
/// ```
/// use evacuation_core_rs::{PathType, Segment};
///
/// let corridor = Segment::new(12.5, PathType::Horizontal);
/// assert_eq!(corridor.width, 1.0);
///
/// let door = Segment::new(0.5, PathType::Door).with_width(0.9);
/// assert_eq!(door.width, 0.9);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Length of the leg along the direction of travel (meters)
    pub length: f64,

    /// Path type, selects the flow-parameter column
    #[serde(rename = "type")]
    pub path_type: PathType,

    /// Clear passage width (meters); missing or null means the default width
    #[serde(default = "default_width", deserialize_with = "width_or_default")]
    pub width: f64,
}

fn default_width() -> f64 {
    DEFAULT_SEGMENT_WIDTH
}

fn width_or_default<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(DEFAULT_SEGMENT_WIDTH))
}

impl Segment {
    /// Create a segment with the default width
    pub fn new(length: f64, path_type: PathType) -> Self {
        Self {
            length,
            path_type,
            width: DEFAULT_SEGMENT_WIDTH,
        }
    }

    /// Set the passage width
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }
}

/// Segment as supplied by a host, before the path type is resolved
///
/// Hosts that hand over loosely typed records (the Python binding, ad-hoc
/// JSON) go through this type so that an unrecognized type string surfaces
/// as `UnknownPathType` and no calculation starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentSpec {
    pub length: f64,

    #[serde(rename = "type")]
    pub path_type: String,

    #[serde(default)]
    pub width: Option<f64>,
}

impl SegmentSpec {
    /// Resolve into a typed segment
    pub fn resolve(&self) -> Result<Segment, RegulationsError> {
        Ok(Segment {
            length: self.length,
            path_type: self.path_type.parse()?,
            width: self.width.unwrap_or(DEFAULT_SEGMENT_WIDTH),
        })
    }
}

/// Resolve a whole path, failing on the first unrecognized type
pub fn resolve_path(specs: &[SegmentSpec]) -> Result<Vec<Segment>, RegulationsError> {
    specs.iter().map(SegmentSpec::resolve).collect()
}
