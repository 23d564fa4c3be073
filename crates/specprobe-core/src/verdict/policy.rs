//! Verdict policy - turns per-case outcomes into a run verdict and exit code

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::report::Summary;

/// Exit code when every case passed (including an empty run)
pub const EXIT_PASS: i32 = 0;
/// Exit code when at least one predicate failed
pub const EXIT_ASSERTION_FAILURE: i32 = 1;
/// Exit code when cases errored at the transport level but none failed a predicate
pub const EXIT_RUN_ERROR: i32 = 2;
/// Exit code for load, config or tool errors (no cases ran)
pub const EXIT_TOOL_ERROR: i32 = 3;

/// Determine the verdict for a run.
///
/// PASS requires every case to pass. A run with zero cases passes vacuously.
#[must_use]
pub fn verdict(summary: &Summary) -> Verdict {
    let status = if summary.failed == 0 && summary.errored == 0 {
        VerdictStatus::Pass
    } else {
        VerdictStatus::Fail
    };

    let exit_code = if summary.failed > 0 {
        EXIT_ASSERTION_FAILURE
    } else if summary.errored > 0 {
        EXIT_RUN_ERROR
    } else {
        EXIT_PASS
    };

    let reason = if status == VerdictStatus::Pass {
        if summary.total == 0 {
            "No endpoints declared".to_string()
        } else {
            "All endpoints passed".to_string()
        }
    } else {
        let mut parts = Vec::new();
        if summary.failed > 0 {
            parts.push(format!("{} failed", summary.failed));
        }
        if summary.errored > 0 {
            parts.push(format!("{} errors (connection/transport)", summary.errored));
        }
        format!(
            "{} of {} endpoints: {}",
            summary.total - summary.passed,
            summary.total,
            parts.join("; ")
        )
    };

    Verdict {
        status,
        exit_code,
        reason,
    }
}

/// Final verdict
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Verdict {
    pub status: VerdictStatus,
    pub exit_code: i32,
    pub reason: String,
}

/// Pass or fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum VerdictStatus {
    Pass,
    Fail,
}

impl std::fmt::Display for VerdictStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Fail => write!(f, "FAIL"),
        }
    }
}
