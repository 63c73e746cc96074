//! Compliance report and verdict

use crate::calculator::{CalculationLog, Method};
use crate::regulations::PermissibleTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of comparing required and permissible evacuation time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    /// Required time within the permissible limit
    Pass,

    /// Required time exceeds the permissible limit
    Fail,

    /// No permissible limit tabulated for the building
    Unknown,
}

impl Verdict {
    /// Compare a required time against a permissible time
    ///
    /// # Example
    /// ```
    /// use evacuation_core_rs::{PermissibleTime, Verdict};
    ///
    /// assert_eq!(Verdict::judge(2.0, PermissibleTime::Limit(6.0)), Verdict::Pass);
    /// assert_eq!(Verdict::judge(6.0, PermissibleTime::Limit(6.0)), Verdict::Pass);
    /// assert_eq!(Verdict::judge(6.5, PermissibleTime::Limit(6.0)), Verdict::Fail);
    /// assert_eq!(Verdict::judge(1.0, PermissibleTime::Unknown), Verdict::Unknown);
    /// ```
    pub fn judge(total_time: f64, permissible: PermissibleTime) -> Self {
        match permissible {
            PermissibleTime::Limit(limit) if total_time > limit => Verdict::Fail,
            PermissibleTime::Limit(_) => Verdict::Pass,
            PermissibleTime::Unknown => Verdict::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Pass => "PASS",
            Verdict::Fail => "FAIL",
            Verdict::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Explicit output of one compliance check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    /// Unique identifier of this check
    pub calculation_id: String,

    pub method: Method,

    /// Density at the origin (persons/m²)
    pub initial_density: f64,

    /// Required evacuation time (minutes)
    pub total_time: f64,

    /// Permissible evacuation time (minutes); `None` when not tabulated
    pub permissible_time: Option<f64>,

    pub verdict: Verdict,

    /// Fingerprint of the regulatory data used
    pub regulations_fingerprint: String,

    /// Human-readable trace
    pub log: String,

    /// Structured trace
    pub trace: CalculationLog,
}

impl ComplianceReport {
    /// Short summary line
    pub fn summary(&self) -> String {
        let permissible = match self.permissible_time {
            Some(t) => format!("{:.2} min", t),
            None => "unknown".to_string(),
        };
        format!(
            "{}: required {:.2} min, permissible {} ({})",
            self.verdict, self.total_time, permissible, self.method
        )
    }
}
