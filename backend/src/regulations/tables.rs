//! Regulatory data file layout
//!
//! Mirrors the JSON document the loader reads:
//!
//! ```text
//! {
//!   "table_11_flow_params":  { "data": [ { "D": 0.1, "horiz": {"v":..,"q":..}, ... } ] },
//!   "table_12_narrow_doors": { "data": [ { "width": 0.6, "v": .., "q": .. } ] },
//!   "limits":                  { "horizontal": { "q_max": .., "q_gran": .., "v_gran": .. } },
//!   "permissible_time_limits": { "category": 6.0 | { "sub_category": 6.0 } }
//! }
//! ```
//!
//! Sections that are absent deserialize to empty tables. Extra keys such as
//! titles or source notes are ignored.

use crate::models::{FlowParams, PathType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One row of Table 11: flow parameters of every path type at a density
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowTableRow {
    /// Tabulated density (persons/m²)
    #[serde(rename = "D")]
    pub d: f64,

    /// Horizontal paths
    pub horiz: FlowParams,

    /// Stairs, downwards
    pub stair_down: FlowParams,

    /// Stairs, upwards
    pub stair_up: FlowParams,

    /// Doors wider than the narrow-door range
    pub door_wide: FlowParams,
}

impl FlowTableRow {
    /// Column of this row for a path type
    pub fn params(&self, path_type: PathType) -> FlowParams {
        match path_type {
            PathType::Horizontal => self.horiz,
            PathType::StairDown => self.stair_down,
            PathType::StairUp => self.stair_up,
            PathType::Door => self.door_wide,
        }
    }
}

/// One row of Table 12: narrow door movement at boundary density
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NarrowDoorRow {
    /// Clear door width (meters)
    pub width: f64,

    /// Movement speed (m/min)
    pub v: f64,

    /// Specific throughput (persons/(m·min))
    pub q: f64,
}

impl NarrowDoorRow {
    pub fn params(&self) -> FlowParams {
        FlowParams {
            v: self.v,
            q: self.q,
        }
    }
}

/// Wrapper matching the `{ "data": [...] }` shape of each table section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSection<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

impl<T> Default for TableSection<T> {
    fn default() -> Self {
        Self { data: Vec::new() }
    }
}

/// Permissible evacuation time of a building category
///
/// A category either carries a single limit or splits further by
/// sub-category (typically the fire-resistance class).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PermissibleEntry {
    /// Limit that applies to the whole category (minutes)
    Direct(f64),

    /// Limits per sub-category (minutes)
    BySubCategory(BTreeMap<String, f64>),
}

/// Complete regulatory data set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegulationData {
    #[serde(default)]
    pub table_11_flow_params: TableSection<FlowTableRow>,

    #[serde(default)]
    pub table_12_narrow_doors: TableSection<NarrowDoorRow>,

    /// Capacity bounds per path type: `q_max`, `q_gran`, `v_gran`
    #[serde(default)]
    pub limits: BTreeMap<String, BTreeMap<String, f64>>,

    #[serde(default)]
    pub permissible_time_limits: BTreeMap<String, PermissibleEntry>,
}

impl RegulationData {
    /// Sort both tables ascending by their key column
    ///
    /// Lookups rely on ascending order; files are expected to be sorted
    /// already, in which case this is a no-op.
    pub(crate) fn normalize(&mut self) {
        self.table_11_flow_params
            .data
            .sort_by(|a, b| a.d.total_cmp(&b.d));
        self.table_12_narrow_doors
            .data
            .sort_by(|a, b| a.width.total_cmp(&b.width));
    }
}
