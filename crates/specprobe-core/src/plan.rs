//! Dry run plan types and config validation
//!
//! Describes what the harness *would* send without sending any requests.
//! Used for pre-flight validation and CI previews.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::Config;
use crate::fixture::fixture_for;
use crate::request::TestCase;

// ── Plan types ──

/// Complete dry run plan: one entry per test case, plus validation results.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RunPlan {
    pub base_url: String,
    /// Test cases in execution order
    pub cases: Vec<TestCase>,
    /// Config/spec validation results
    pub validations: Vec<Validation>,
}

/// A validation check result.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Validation {
    pub check: String,
    pub status: ValidationStatus,
    pub message: String,
}

/// Status of a validation check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    Ok,
    Warning,
    Error,
}

impl std::fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::Warning => write!(f, "WARNING"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

// ── Validation ──

/// Validate config and produce validation results.
#[must_use]
pub fn validate_config(config: &Config) -> Vec<Validation> {
    if config.spec.exists() {
        vec![Validation {
            check: "spec".into(),
            status: ValidationStatus::Ok,
            message: format!("spec: {} (exists)", config.spec.display()),
        }]
    } else {
        vec![Validation {
            check: "spec".into(),
            status: ValidationStatus::Error,
            message: format!("spec: {} (not found)", config.spec.display()),
        }]
    }
}

/// Check the base URL taken from the first declared server entry.
#[must_use]
pub fn validate_base_url(base_url: &str) -> Validation {
    if base_url.starts_with("http://") || base_url.starts_with("https://") {
        Validation {
            check: "base_url".into(),
            status: ValidationStatus::Ok,
            message: format!("base_url: {base_url}"),
        }
    } else {
        Validation {
            check: "base_url".into(),
            status: ValidationStatus::Warning,
            message: format!("base_url: {base_url} (missing http:// or https:// prefix)"),
        }
    }
}

// ── Display helpers ──

impl RunPlan {
    /// Format as human-readable terminal output.
    #[must_use]
    pub fn to_terminal(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!(
            "Dry run: {} endpoints against {}",
            self.cases.len(),
            self.base_url,
        ));
        lines.push(String::new());

        for case in &self.cases {
            let req = &case.request;
            lines.push(case.label());
            lines.push(format!("  {} {}", req.method, req.url));
            for (key, value) in &req.headers {
                lines.push(format!("  {key}: {value}"));
            }
            if let Some(body) = &req.body {
                lines.push(format!("  body: {body:?}"));
            }
            if fixture_for(&req.method).is_empty() {
                lines.push("  (no fixture, sent bare)".into());
            }
            lines.push(String::new());
        }

        if !self.validations.is_empty() {
            lines.push("Validation:".into());
            for v in &self.validations {
                lines.push(format!("  [{}] {}", v.status, v.message));
            }
        }

        lines.join("\n")
    }

    /// Returns true if any validation has Error status.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.validations
            .iter()
            .any(|v| v.status == ValidationStatus::Error)
    }

    /// Returns true if any validation has Warning status.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.validations
            .iter()
            .any(|v| v.status == ValidationStatus::Warning)
    }
}
