//! Evacuation check request
//!
//! The explicit, immutable input of one compliance check. Fields a host may
//! leave out carry the regulation's customary defaults.

use crate::calculator::{CalculationError, CalculationOptions};
use crate::models::{resolve_path, Segment, SegmentSpec};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Origin area assumed when the host cannot measure the room (m²)
pub const DEFAULT_ORIGIN_AREA: f64 = 100.0;

/// Building category assumed when none is given
pub const DEFAULT_BUILDING_CATEGORY: &str = "buildings_under_25m";

/// Sub-category assumed when none is given
pub const DEFAULT_SUB_CATEGORY: &str = "fire_resistance_I_II";

/// Everything needed to check one evacuation path
///
/// # Example
/// ```
/// use evacuation_core_rs::EvacuationRequest;
///
/// let req = EvacuationRequest::from_json_str(r#"{
///     "segments": [{"length": 10.0, "type": "horizontal"}],
///     "occupant_count": 10
/// }"#).unwrap();
///
/// assert_eq!(req.origin_area, 100.0);
/// assert_eq!(req.segments[0].width, 1.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvacuationRequest {
    /// Path segments in travel order
    pub segments: Vec<Segment>,

    /// Number of occupants (positive)
    pub occupant_count: u32,

    /// Floor area of the origin room (m²)
    #[serde(default = "default_origin_area")]
    pub origin_area: f64,

    /// Building category key of the permissible-time table
    #[serde(default = "default_building_category")]
    pub building_category: String,

    /// Sub-category key, for categories split by sub-category
    #[serde(default = "default_sub_category")]
    pub sub_category: Option<String>,

    #[serde(default)]
    pub options: CalculationOptions,
}

fn default_origin_area() -> f64 {
    DEFAULT_ORIGIN_AREA
}

fn default_building_category() -> String {
    DEFAULT_BUILDING_CATEGORY.to_string()
}

fn default_sub_category() -> Option<String> {
    Some(DEFAULT_SUB_CATEGORY.to_string())
}

impl EvacuationRequest {
    /// Request with default area, category and options
    pub fn new(segments: Vec<Segment>, occupant_count: u32) -> Self {
        Self {
            segments,
            occupant_count,
            origin_area: DEFAULT_ORIGIN_AREA,
            building_category: default_building_category(),
            sub_category: default_sub_category(),
            options: CalculationOptions::default(),
        }
    }

    pub fn with_origin_area(mut self, area: f64) -> Self {
        self.origin_area = area;
        self
    }

    pub fn with_category(mut self, category: &str, sub_category: Option<&str>) -> Self {
        self.building_category = category.to_string();
        self.sub_category = sub_category.map(str::to_string);
        self
    }

    pub fn with_options(mut self, options: CalculationOptions) -> Self {
        self.options = options;
        self
    }

    /// Parse a JSON request
    ///
    /// Segment types are resolved before anything else, so an unrecognized
    /// type is reported as `UnknownPathType` rather than a generic parse
    /// failure.
    ///
    /// # Errors
    ///
    /// - `Regulations(UnknownPathType)` for an unrecognized segment type
    /// - `InvalidRequest` for malformed JSON, missing fields or a zero
    ///   occupant count
    pub fn from_json_str(json: &str) -> Result<Self, CalculationError> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| CalculationError::InvalidRequest(format!("Request parse failed: {}", e)))?;

        if let Some(raw) = value.get("segments") {
            let specs: Vec<SegmentSpec> = serde_json::from_value(raw.clone()).map_err(|e| {
                CalculationError::InvalidRequest(format!("Invalid segments: {}", e))
            })?;
            resolve_path(&specs)?;
        }

        let request: EvacuationRequest = serde_json::from_value(value)
            .map_err(|e| CalculationError::InvalidRequest(format!("Invalid request: {}", e)))?;
        request.validate()?;
        Ok(request)
    }

    /// Reject requests the calculation cannot meaningfully answer
    ///
    /// Occupant count must be positive; segment lengths and widths must be
    /// finite and positive.
    pub fn validate(&self) -> Result<(), CalculationError> {
        if self.occupant_count == 0 {
            return Err(CalculationError::InvalidRequest(
                "occupant_count must be positive".to_string(),
            ));
        }

        for (i, seg) in self.segments.iter().enumerate() {
            if !(seg.length.is_finite() && seg.length > 0.0) {
                return Err(CalculationError::InvalidRequest(format!(
                    "segment {} length must be a positive number, got {}",
                    i + 1,
                    seg.length
                )));
            }
            if !(seg.width.is_finite() && seg.width > 0.0) {
                return Err(CalculationError::InvalidRequest(format!(
                    "segment {} width must be a positive number, got {}",
                    i + 1,
                    seg.width
                )));
            }
        }
        Ok(())
    }
}
