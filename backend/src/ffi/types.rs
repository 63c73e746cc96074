//! Type conversion utilities for FFI boundary
//!
//! Converts between Rust types and PyO3-compatible types (PyDict, PyList).

use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use crate::calculator::{CalculationError, CalculationOptions, ContinuityMode};
use crate::compliance::{
    ComplianceReport, EvacuationRequest, DEFAULT_BUILDING_CATEGORY, DEFAULT_ORIGIN_AREA,
    DEFAULT_SUB_CATEGORY,
};
use crate::models::{resolve_path, Segment, SegmentSpec};

// ========================================================================
// PyDict Extraction Helpers
// ========================================================================

/// Extract a required field from a Python dict with clear error messages.
fn extract_required<'py, T>(dict: &Bound<'py, PyDict>, key: &str) -> PyResult<T>
where
    T: FromPyObject<'py>,
{
    dict.get_item(key)?
        .ok_or_else(|| {
            PyErr::new::<pyo3::exceptions::PyValueError, _>(format!(
                "Missing required field '{}'",
                key
            ))
        })?
        .extract()
}

/// Extract an optional field from a Python dict.
///
/// A Python `None` counts as missing.
fn extract_optional<'py, T>(dict: &Bound<'py, PyDict>, key: &str) -> PyResult<Option<T>>
where
    T: FromPyObject<'py>,
{
    match dict.get_item(key)? {
        Some(value) if !value.is_none() => Ok(Some(value.extract()?)),
        _ => Ok(None),
    }
}

/// Extract a field with a default value if missing.
fn extract_with_default<'py, T>(dict: &Bound<'py, PyDict>, key: &str, default: T) -> PyResult<T>
where
    T: FromPyObject<'py>,
{
    Ok(extract_optional(dict, key)?.unwrap_or(default))
}

/// Map a calculation error onto a Python exception
pub fn calculation_error_to_py(err: CalculationError) -> PyErr {
    PyErr::new::<pyo3::exceptions::PyValueError, _>(err.to_string())
}

// ========================================================================
// Parsers
// ========================================================================

/// Convert a list of segment dicts to typed segments
///
/// Each dict carries `length`, `type` (default "horizontal")
/// and optionally `width`. An unrecognized type fails the whole list.
pub fn parse_segments(py_segments: &Bound<'_, PyList>) -> PyResult<Vec<Segment>> {
    let mut specs = Vec::with_capacity(py_segments.len());
    for item in py_segments.iter() {
        let seg: Bound<'_, PyDict> = item.downcast_into()?;
        specs.push(SegmentSpec {
            length: extract_required(&seg, "length")?,
            path_type: extract_with_default(&seg, "type", "horizontal".to_string())?,
            width: extract_optional(&seg, "width")?,
        });
    }

    resolve_path(&specs).map_err(|e| calculation_error_to_py(e.into()))
}

/// Convert a Python dict to CalculationOptions
fn parse_options(py_options: &Bound<'_, PyDict>) -> PyResult<CalculationOptions> {
    let continuity: String =
        extract_with_default(py_options, "continuity", "pinned_density".to_string())?;
    let continuity = match continuity.as_str() {
        "pinned_density" | "pinned" => ContinuityMode::PinnedDensity,
        "width_continuity" | "width" => ContinuityMode::WidthContinuity,
        other => {
            return Err(PyErr::new::<pyo3::exceptions::PyValueError, _>(format!(
                "Invalid continuity: '{}'. Must be 'pinned_density' or 'width_continuity'",
                other
            )));
        }
    };

    Ok(CalculationOptions {
        continuity,
        narrow_door_bottleneck: extract_with_default(py_options, "narrow_door_bottleneck", false)?,
    })
}

/// Convert a Python dict to EvacuationRequest
///
/// # Errors
///
/// Returns PyErr if:
/// - `segments` or `occupant_count` is missing
/// - A segment type is unrecognized
/// - Type conversions fail
pub fn parse_request(py_request: &Bound<'_, PyDict>) -> PyResult<EvacuationRequest> {
    let py_segments: Bound<'_, PyList> = py_request
        .get_item("segments")?
        .ok_or_else(|| {
            PyErr::new::<pyo3::exceptions::PyValueError, _>("Missing required field 'segments'")
        })?
        .downcast_into()?;
    let segments = parse_segments(&py_segments)?;

    let occupant_count: u32 = extract_required(py_request, "occupant_count")?;
    let origin_area: f64 = extract_with_default(py_request, "origin_area", DEFAULT_ORIGIN_AREA)?;
    let building_category: String = extract_with_default(
        py_request,
        "building_category",
        DEFAULT_BUILDING_CATEGORY.to_string(),
    )?;
    let sub_category: Option<String> = match py_request.get_item("sub_category")? {
        None => Some(DEFAULT_SUB_CATEGORY.to_string()),
        Some(value) if value.is_none() => None,
        Some(value) => Some(value.extract()?),
    };

    let options = match py_request.get_item("options")? {
        Some(py_opts) if !py_opts.is_none() => {
            let opts_dict: Bound<'_, PyDict> = py_opts.downcast_into()?;
            parse_options(&opts_dict)?
        }
        _ => CalculationOptions::default(),
    };

    let request = EvacuationRequest {
        segments,
        occupant_count,
        origin_area,
        building_category,
        sub_category,
        options,
    };
    request.validate().map_err(calculation_error_to_py)?;
    Ok(request)
}

// ========================================================================
// Converters
// ========================================================================

/// Convert ComplianceReport to a Python dict
///
/// Keys follow the host component's outputs: `total_time`,
/// `permissible_time` (None when unknown), `compliance`, `log`.
pub fn report_to_py(py: Python<'_>, report: &ComplianceReport) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new(py);

    dict.set_item("calculation_id", &report.calculation_id)?;
    dict.set_item("method", report.method.to_string())?;
    dict.set_item("initial_density", report.initial_density)?;
    dict.set_item("total_time", report.total_time)?;
    dict.set_item("permissible_time", report.permissible_time)?;
    dict.set_item("compliance", report.verdict.as_str())?;
    dict.set_item("regulations_fingerprint", &report.regulations_fingerprint)?;
    dict.set_item("log", &report.log)?;

    let lines: Vec<String> = report
        .trace
        .entries()
        .iter()
        .map(|e| e.to_string())
        .collect();
    dict.set_item("trace", PyList::new(py, lines)?)?;

    Ok(dict.into())
}
