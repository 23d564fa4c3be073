//! specprobe-core: Core types and verdict logic for API contract smoke tests
//!
//! This crate holds the canned fixture table, request building, per-case
//! results and the policy that turns them into a pass/fail verdict.
//! It performs no network I/O.

pub mod config;
pub mod fixture;
pub mod generator;
pub mod method;
pub mod plan;
pub mod report;
pub mod request;
pub mod verdict;

pub use config::{Config, ConfigError};
pub use fixture::{Fixture, fixture_for};
pub use generator::to_http_file;
pub use method::HttpMethod;
pub use plan::RunPlan;
pub use report::{CaseReport, RunReport, Summary};
pub use request::{Endpoint, PreparedRequest, TestCase};
pub use verdict::{
    AssertionFailure, CaseOutcome, CaseStatus, ObservedResponse, Predicate, RunError, TestResult,
    Verdict, VerdictStatus,
};
