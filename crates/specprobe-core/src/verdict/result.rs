//! Per-case results: predicates, observed responses, transport errors

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One of the three fixed response checks, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    /// Response status is 200
    StatusOk,
    /// Response body is not empty
    NonEmptyBody,
    /// Response Content-Type equals the request's Accept-Type (exact match)
    ContentTypeMatchesAcceptType,
}

impl Predicate {
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::StatusOk => "status is 200",
            Self::NonEmptyBody => "body is not empty",
            Self::ContentTypeMatchesAcceptType => "Content-Type matches Accept-Type",
        }
    }
}

impl std::fmt::Display for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

/// What came back from the target service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ObservedResponse {
    pub status: u16,
    /// Body length in bytes
    pub body_len: u64,
    /// Raw `Content-Type` header value, if present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

/// Outcome of evaluating the predicates against one response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TestResult {
    pub passed: bool,
    /// First predicate that did not hold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_predicate: Option<Predicate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_values: Option<ObservedResponse>,
    /// Accept-Type the response was checked against, if the request had one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_content_type: Option<String>,
}

impl TestResult {
    #[must_use]
    pub fn pass(observed: ObservedResponse, expected_content_type: Option<String>) -> Self {
        Self {
            passed: true,
            failed_predicate: None,
            observed_values: Some(observed),
            expected_content_type,
        }
    }

    #[must_use]
    pub fn fail(
        predicate: Predicate,
        observed: ObservedResponse,
        expected_content_type: Option<String>,
    ) -> Self {
        Self {
            passed: false,
            failed_predicate: Some(predicate),
            observed_values: Some(observed),
            expected_content_type,
        }
    }

    /// Diagnostic view of the failed predicate, `None` if the case passed.
    #[must_use]
    pub fn assertion_failure(&self) -> Option<AssertionFailure> {
        let predicate = self.failed_predicate?;
        let observed = self.observed_values.as_ref()?;
        let (expected, actual) = match predicate {
            Predicate::StatusOk => ("200".to_string(), observed.status.to_string()),
            Predicate::NonEmptyBody => (
                "> 0 bytes".to_string(),
                format!("{} bytes", observed.body_len),
            ),
            Predicate::ContentTypeMatchesAcceptType => (
                self.expected_content_type.clone().unwrap_or_default(),
                observed
                    .content_type
                    .clone()
                    .unwrap_or_else(|| "<missing>".to_string()),
            ),
        };
        Some(AssertionFailure {
            predicate,
            expected,
            observed: actual,
        })
    }
}

/// A predicate that did not hold, with the values involved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AssertionFailure {
    pub predicate: Predicate,
    pub expected: String,
    pub observed: String,
}

impl std::fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: expected {}, got {}",
            self.predicate, self.expected, self.observed
        )
    }
}

/// Transport-level failure of a single case. Never fatal to the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunError {
    #[error("connection failed: {message}")]
    Connect { message: String },
    #[error("request timed out: {message}")]
    Timeout { message: String },
    /// Method or URL the HTTP client refused to build
    #[error("invalid request: {message}")]
    InvalidRequest { message: String },
    #[error("transport error: {message}")]
    Transport { message: String },
}

/// How a test case ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CaseOutcome {
    /// A response arrived and the predicates were evaluated
    Completed { result: TestResult },
    /// No response: transport error
    Errored { error: RunError },
}

impl CaseOutcome {
    #[must_use]
    pub fn status(&self) -> CaseStatus {
        match self {
            Self::Completed { result } if result.passed => CaseStatus::Pass,
            Self::Completed { .. } => CaseStatus::Fail,
            Self::Errored { .. } => CaseStatus::Error,
        }
    }
}

/// Pass / fail / error, the three reportable states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CaseStatus {
    Pass,
    Fail,
    Error,
}

impl std::fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Fail => write!(f, "FAIL"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}
