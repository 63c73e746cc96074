//! PyO3 wrapper for the evacuation calculator
//!
//! This module provides the Python interface used by host components.

use std::sync::Arc;

use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use super::types::{calculation_error_to_py, parse_request, parse_segments, report_to_py};
use crate::calculator::EvacuationCalculator;
use crate::compliance;
use crate::regulations::RegulationsLoader;

/// Python wrapper for the evacuation calculator
///
/// # Example (from Python)
///
/// ```python
/// from evacuation_core_rs import EvacuationCalculator
///
/// calc = EvacuationCalculator()            # bundled regulations
/// total, log = calc.calculate([{"length": 10.0, "type": "horizontal"}], 10, 100.0)
///
/// report = calc.evaluate({
///     "segments": [{"length": 10.0, "type": "horizontal", "width": 1.2}],
///     "occupant_count": 60,
///     "origin_area": 80.0,
///     "building_category": "buildings_under_25m",
///     "sub_category": "fire_resistance_I_II",
/// })
/// print(report["compliance"], report["total_time"])
/// ```
#[pyclass(name = "EvacuationCalculator")]
pub struct PyEvacuationCalculator {
    reg: Arc<RegulationsLoader>,
}

#[pymethods]
impl PyEvacuationCalculator {
    /// Create a calculator
    ///
    /// # Arguments
    ///
    /// * `regulations_path` - Regulatory data file; the bundled data is used
    ///   when omitted. An unreadable file leaves the tables empty.
    #[new]
    #[pyo3(signature = (regulations_path=None))]
    fn new(regulations_path: Option<String>) -> Self {
        let reg = match regulations_path {
            Some(path) => RegulationsLoader::load_or_empty(path),
            None => RegulationsLoader::bundled(),
        };
        Self { reg: Arc::new(reg) }
    }

    /// Occupant density N / A, clamped to 9.2
    fn density(&self, occupant_count: u32, area: f64) -> f64 {
        EvacuationCalculator::new(Arc::clone(&self.reg)).density(occupant_count, area)
    }

    /// "Method L" or "Method Q"
    fn select_method(&self, occupant_count: u32) -> String {
        EvacuationCalculator::new(Arc::clone(&self.reg))
            .select_method(occupant_count)
            .to_string()
    }

    /// Required evacuation time and text trace
    ///
    /// # Returns
    ///
    /// Tuple `(total_time, log)`
    ///
    /// # Errors
    ///
    /// Raises ValueError for an unrecognized segment type or a table error.
    fn calculate(
        &self,
        segments: &Bound<'_, PyList>,
        occupant_count: u32,
        origin_area: f64,
    ) -> PyResult<(f64, String)> {
        let segments = parse_segments(segments)?;
        let result = EvacuationCalculator::new(Arc::clone(&self.reg))
            .calculate(&segments, occupant_count, origin_area)
            .map_err(calculation_error_to_py)?;
        Ok((result.total_time, result.log.render()))
    }

    /// Full compliance check of a request dict
    fn evaluate(&self, py: Python<'_>, request: &Bound<'_, PyDict>) -> PyResult<Py<PyDict>> {
        let request = parse_request(request)?;
        let report = compliance::evaluate(&self.reg, &request).map_err(calculation_error_to_py)?;
        report_to_py(py, &report)
    }

    /// Permissible time in minutes, or None when not tabulated
    #[pyo3(signature = (category, sub_category=None))]
    fn permissible_time(&self, category: &str, sub_category: Option<&str>) -> Option<f64> {
        self.reg.permissible_time(category, sub_category).minutes()
    }

    /// Fingerprint of the loaded regulatory data
    fn regulations_fingerprint(&self) -> String {
        self.reg.fingerprint().to_string()
    }
}
