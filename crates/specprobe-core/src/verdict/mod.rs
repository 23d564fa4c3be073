//! Verdict module - per-case results and run-level policy

mod policy;
mod result;

pub use policy::{
    EXIT_ASSERTION_FAILURE, EXIT_PASS, EXIT_RUN_ERROR, EXIT_TOOL_ERROR, Verdict, VerdictStatus,
    verdict,
};
pub use result::{
    AssertionFailure, CaseOutcome, CaseStatus, ObservedResponse, Predicate, RunError, TestResult,
};
