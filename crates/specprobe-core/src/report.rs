//! Run report: every case with its request and outcome, plus summary counts
//!
//! This is the JSON interchange format written by `specprobe run --output json`
//! and `--report`. Its JSON Schema comes from [`generate_schema`].

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::request::{Endpoint, PreparedRequest};
use crate::verdict::{self, CaseOutcome, CaseStatus, Verdict};

/// One executed test case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CaseReport {
    pub endpoint: Endpoint,
    pub request: PreparedRequest,
    #[serde(flatten)]
    pub outcome: CaseOutcome,
    /// Wall time from send to last body byte (or error), in milliseconds
    #[serde(default)]
    pub elapsed_ms: u64,
}

impl CaseReport {
    #[must_use]
    pub fn status(&self) -> CaseStatus {
        self.outcome.status()
    }

    /// One-line diagnostic for a case that did not pass.
    #[must_use]
    pub fn reason(&self) -> Option<String> {
        match &self.outcome {
            CaseOutcome::Completed { result } => {
                result.assertion_failure().map(|af| af.to_string())
            }
            CaseOutcome::Errored { error } => Some(error.to_string()),
        }
    }
}

/// Counts per case status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Summary {
    pub total: u64,
    pub passed: u64,
    pub failed: u64,
    pub errored: u64,
}

impl Summary {
    #[must_use]
    pub fn from_cases(cases: &[CaseReport]) -> Self {
        let mut summary = Self::default();
        for case in cases {
            summary.total += 1;
            match case.status() {
                CaseStatus::Pass => summary.passed += 1,
                CaseStatus::Fail => summary.failed += 1,
                CaseStatus::Error => summary.errored += 1,
            }
        }
        summary
    }
}

/// Result of one harness run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RunReport {
    /// Base URL taken from the first server entry
    pub base_url: String,
    pub summary: Summary,
    pub cases: Vec<CaseReport>,
}

impl RunReport {
    #[must_use]
    pub fn new(base_url: impl Into<String>, cases: Vec<CaseReport>) -> Self {
        Self {
            base_url: base_url.into(),
            summary: Summary::from_cases(&cases),
            cases,
        }
    }

    #[must_use]
    pub fn verdict(&self) -> Verdict {
        verdict::verdict(&self.summary)
    }

    /// Cases that failed a predicate or errored.
    pub fn unsuccessful(&self) -> impl Iterator<Item = &CaseReport> {
        self.cases.iter().filter(|c| c.status() != CaseStatus::Pass)
    }
}

/// Generate JSON Schema for the report format.
#[must_use]
pub fn generate_schema() -> String {
    let schema = schemars::schema_for!(RunReport);
    serde_json::to_string_pretty(&schema).expect("schema serialization should not fail")
}
