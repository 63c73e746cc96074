//! Regulations loader
//!
//! Owns the regulatory reference data and answers the table queries the
//! calculator needs:
//!
//! - **Table 11** flow parameters, looked up with the "next higher tabulated
//!   density" rule (never interpolated down to a more favorable density)
//! - **Table 12** narrow-door parameters, linearly interpolated by width
//! - **Permissible times** per building category and sub-category
//! - **Limits** per path type (exposed, not used by the time integration)
//!
//! # Critical Invariants
//!
//! - Tables are loaded once at construction and never mutated afterwards
//! - Every density reaching a Table-11 scan is clamped to `[0, 9.2]`
//! - An empty table is an error for flow lookups, never a silent zero

use super::tables::{FlowTableRow, NarrowDoorRow, PermissibleEntry, RegulationData};
use super::RegulationsError;
use crate::models::{clamp_density, FlowParams, PathType, BOUNDARY_DENSITY};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Narrowest door covered by Table 12 (meters)
pub const NARROW_DOOR_MIN_WIDTH: f64 = 0.6;

/// Widest door covered by Table 12 (meters)
pub const NARROW_DOOR_MAX_WIDTH: f64 = 1.6;

/// Regulatory data shipped with the crate
const BUNDLED_REGULATIONS: &str = include_str!("../../data/regulations.json");

/// Permissible evacuation time for a building
///
/// `Unknown` stands in for the regulation's "unlimited / not determined"
/// placeholder: the category or sub-category is not tabulated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "minutes", rename_all = "snake_case")]
pub enum PermissibleTime {
    /// Tabulated limit (minutes)
    Limit(f64),

    /// No tabulated limit
    Unknown,
}

impl PermissibleTime {
    /// Limit in minutes, if known
    pub fn minutes(&self) -> Option<f64> {
        match self {
            PermissibleTime::Limit(t) => Some(*t),
            PermissibleTime::Unknown => None,
        }
    }
}

/// Read-only holder of the regulatory tables
///
/// Cheap to share: wrap in an `Arc` and hand the same instance to any number
/// of calculators.
///
/// # Example
/// ```
/// use evacuation_core_rs::{PathType, RegulationsLoader};
///
/// let reg = RegulationsLoader::bundled();
/// let params = reg.flow_params(0.1, PathType::Horizontal).unwrap();
/// assert_eq!(params.v, 100.0);
/// ```
#[derive(Debug, Clone)]
pub struct RegulationsLoader {
    data: RegulationData,
    fingerprint: String,
}

impl RegulationsLoader {
    /// Parse a regulatory data document
    ///
    /// # Errors
    ///
    /// Returns `DataLoadFailure` if the text is not valid JSON or a section
    /// has the wrong shape.
    pub fn from_json_str(json: &str) -> Result<Self, RegulationsError> {
        let value: Value = serde_json::from_str(json).map_err(|e| {
            RegulationsError::DataLoadFailure(format!("Regulations parse failed: {}", e))
        })?;
        Self::from_value(value)
    }

    /// Build a loader from an already parsed JSON document
    pub fn from_value(value: Value) -> Result<Self, RegulationsError> {
        let fingerprint = compute_fingerprint(&value)?;
        let mut data: RegulationData = serde_json::from_value(value).map_err(|e| {
            RegulationsError::DataLoadFailure(format!("Regulations layout invalid: {}", e))
        })?;
        data.normalize();

        tracing::debug!(
            table_11_rows = data.table_11_flow_params.data.len(),
            table_12_rows = data.table_12_narrow_doors.data.len(),
            categories = data.permissible_time_limits.len(),
            %fingerprint,
            "regulations loaded"
        );

        Ok(Self { data, fingerprint })
    }

    /// Read and parse a regulatory data file
    ///
    /// # Errors
    ///
    /// Returns `DataLoadFailure` if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RegulationsError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            RegulationsError::DataLoadFailure(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&text)
    }

    /// Load a data file, continuing with empty tables if it is unusable
    ///
    /// Permissible-time lookups against the empty set report `Unknown`;
    /// flow lookups fail with `EmptyTable`.
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        match Self::from_path(path.as_ref()) {
            Ok(loader) => loader,
            Err(e) => {
                tracing::warn!(
                    path = %path.as_ref().display(),
                    error = %e,
                    "regulations unavailable, continuing with empty tables"
                );
                Self::empty()
            }
        }
    }

    /// Loader over the data file bundled with the crate
    pub fn bundled() -> Self {
        match Self::from_json_str(BUNDLED_REGULATIONS) {
            Ok(loader) => loader,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "bundled regulations invalid, continuing with empty tables"
                );
                Self::empty()
            }
        }
    }

    /// Loader with no tables at all
    pub fn empty() -> Self {
        let value = Value::Object(serde_json::Map::new());
        let fingerprint = compute_fingerprint(&value).unwrap_or_default();
        Self {
            data: RegulationData::default(),
            fingerprint,
        }
    }

    /// SHA-256 of the canonical JSON the tables were loaded from
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Table 11 rows, ascending by density
    pub fn flow_table(&self) -> &[FlowTableRow] {
        &self.data.table_11_flow_params.data
    }

    /// Table 12 rows, ascending by width
    pub fn narrow_door_table(&self) -> &[NarrowDoorRow] {
        &self.data.table_12_narrow_doors.data
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Speed and specific throughput for a density and path type
    ///
    /// The density is clamped to the boundary density, then the first
    /// Table-11 row whose `D` is greater than or equal to it is used. If no row
    /// qualifies the highest-density row is returned.
    ///
    /// # Errors
    ///
    /// Returns `EmptyTable` if Table 11 has no rows.
    pub fn flow_params(
        &self,
        density: f64,
        path_type: PathType,
    ) -> Result<FlowParams, RegulationsError> {
        let density = clamp_density(density);
        let rows = self.flow_table();

        let row = rows
            .iter()
            .find(|row| row.d >= density)
            .or_else(|| rows.last())
            .ok_or(RegulationsError::EmptyTable("table_11_flow_params"))?;

        Ok(row.params(path_type))
    }

    /// Flow parameters of a narrow door at boundary density
    ///
    /// Width is clamped to `[0.6, 1.6]`. An exact row match is returned as
    /// is; otherwise `v` and `q` are interpolated independently between the
    /// bracketing rows. With a single bracketing row that row is returned.
    ///
    /// # Errors
    ///
    /// Returns `EmptyTable` if Table 12 has no rows.
    pub fn narrow_door_params(&self, width: f64) -> Result<FlowParams, RegulationsError> {
        let width = width.clamp(NARROW_DOOR_MIN_WIDTH, NARROW_DOOR_MAX_WIDTH);

        let mut lower: Option<&NarrowDoorRow> = None;
        let mut upper: Option<&NarrowDoorRow> = None;

        for row in self.narrow_door_table() {
            if row.width == width {
                return Ok(row.params());
            }
            if row.width < width {
                lower = Some(row);
            }
            if row.width > width {
                upper = Some(row);
                break;
            }
        }

        match (lower, upper) {
            (Some(lo), Some(hi)) => {
                let ratio = (width - lo.width) / (hi.width - lo.width);
                Ok(lo.params().lerp(&hi.params(), ratio))
            }
            (Some(only), None) | (None, Some(only)) => Ok(only.params()),
            (None, None) => Err(RegulationsError::EmptyTable("table_12_narrow_doors")),
        }
    }

    /// Lowest tabulated density at which `path_type` carries `q_target`
    ///
    /// Inverse of `flow_params` on the rising branch of the throughput curve.
    /// If no row reaches the target the path is saturated and the boundary
    /// density is returned.
    ///
    /// # Errors
    ///
    /// Returns `EmptyTable` if Table 11 has no rows.
    pub fn density_for_throughput(
        &self,
        q_target: f64,
        path_type: PathType,
    ) -> Result<f64, RegulationsError> {
        let rows = self.flow_table();
        if rows.is_empty() {
            return Err(RegulationsError::EmptyTable("table_11_flow_params"));
        }

        Ok(rows
            .iter()
            .find(|row| row.params(path_type).q >= q_target)
            .map(|row| row.d)
            .unwrap_or(BOUNDARY_DENSITY))
    }

    /// Permissible evacuation time for a building category
    ///
    /// # Example
    /// ```
    /// use evacuation_core_rs::{PermissibleTime, RegulationsLoader};
    ///
    /// let reg = RegulationsLoader::bundled();
    /// let t = reg.permissible_time("buildings_under_25m", Some("fire_resistance_I_II"));
    /// assert!(matches!(t, PermissibleTime::Limit(_)));
    /// assert_eq!(reg.permissible_time("no_such_category", None), PermissibleTime::Unknown);
    /// ```
    pub fn permissible_time(&self, category: &str, sub_category: Option<&str>) -> PermissibleTime {
        match self.data.permissible_time_limits.get(category) {
            Some(PermissibleEntry::Direct(t)) => PermissibleTime::Limit(*t),
            Some(PermissibleEntry::BySubCategory(by_sub)) => sub_category
                .and_then(|sub| by_sub.get(sub))
                .map(|t| PermissibleTime::Limit(*t))
                .unwrap_or(PermissibleTime::Unknown),
            None => PermissibleTime::Unknown,
        }
    }

    /// Auxiliary capacity bound (`q_max`, `q_gran` or `v_gran`) of a path type
    ///
    /// Returns 0.0 when the path type or parameter is not tabulated.
    pub fn limit(&self, path_key: &str, param: &str) -> f64 {
        self.data
            .limits
            .get(path_key)
            .and_then(|params| params.get(param))
            .copied()
            .unwrap_or(0.0)
    }
}

impl Default for RegulationsLoader {
    fn default() -> Self {
        Self::bundled()
    }
}

// ============================================================================
// Fingerprint
// ============================================================================

/// SHA-256 of a JSON document with all object keys sorted
fn compute_fingerprint(value: &Value) -> Result<String, RegulationsError> {
    fn canonicalize(value: &Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> = map
                    .iter()
                    .map(|(k, v)| (k.clone(), canonicalize(v)))
                    .collect();
                Value::Object(sorted.into_iter().collect())
            }
            Value::Array(arr) => Value::Array(arr.iter().map(canonicalize).collect()),
            other => other.clone(),
        }
    }

    let json = serde_json::to_string(&canonicalize(value)).map_err(|e| {
        RegulationsError::DataLoadFailure(format!("Fingerprint serialization failed: {}", e))
    })?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}
