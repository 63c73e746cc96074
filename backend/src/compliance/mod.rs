//! Compliance check
//!
//! Runs a calculation for a request, looks up the permissible time for the
//! building and derives the verdict:
//!
//! 1. Validate the request (positive occupant count)
//! 2. Calculate required evacuation time (Method L or Q)
//! 3. Look up permissible time by category / sub-category
//! 4. Verdict: UNKNOWN if no limit, FAIL if required > permissible, else PASS
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use evacuation_core_rs::{
//!     compliance, EvacuationRequest, PathType, RegulationsLoader, Segment, Verdict,
//! };
//!
//! let reg = Arc::new(RegulationsLoader::bundled());
//! let request = EvacuationRequest::new(vec![Segment::new(25.0, PathType::Horizontal)], 20);
//!
//! let report = compliance::evaluate(&reg, &request).unwrap();
//! assert_eq!(report.verdict, Verdict::Pass);
//! ```

pub mod report;
pub mod request;

use crate::calculator::{CalculationError, EvacuationCalculator};
use crate::regulations::RegulationsLoader;
use std::sync::Arc;

pub use report::{ComplianceReport, Verdict};
pub use request::{
    EvacuationRequest, DEFAULT_BUILDING_CATEGORY, DEFAULT_ORIGIN_AREA, DEFAULT_SUB_CATEGORY,
};

/// Check one request against the regulations
///
/// # Errors
///
/// - `InvalidRequest` if the request fails validation
/// - `Regulations` if a table lookup fails during the calculation
pub fn evaluate(
    reg: &Arc<RegulationsLoader>,
    request: &EvacuationRequest,
) -> Result<ComplianceReport, CalculationError> {
    request.validate()?;

    let calculator = EvacuationCalculator::new(Arc::clone(reg)).with_options(request.options);
    let result = calculator.calculate(
        &request.segments,
        request.occupant_count,
        request.origin_area,
    )?;

    let permissible =
        reg.permissible_time(&request.building_category, request.sub_category.as_deref());
    let verdict = Verdict::judge(result.total_time, permissible);

    tracing::info!(
        category = %request.building_category,
        sub_category = request.sub_category.as_deref().unwrap_or(""),
        total_time = result.total_time,
        %verdict,
        "compliance evaluated"
    );

    Ok(ComplianceReport {
        calculation_id: uuid::Uuid::new_v4().to_string(),
        method: result.method,
        initial_density: result.initial_density,
        total_time: result.total_time,
        permissible_time: permissible.minutes(),
        verdict,
        regulations_fingerprint: reg.fingerprint().to_string(),
        log: result.log.render(),
        trace: result.log,
    })
}
