//! Sequential contract-test driver
//!
//! Turns the document's endpoints into test cases, sends each request with one
//! shared blocking client, and evaluates the response predicates.

mod checks;

use std::time::{Duration, Instant};

use specprobe_core::plan::{RunPlan, validate_base_url};
use specprobe_core::{
    CaseOutcome, CaseReport, ObservedResponse, PreparedRequest, RunError, RunReport, TestCase,
};

use crate::spec::{LoadError, SpecDocument};

/// Transport timeout. Not user-configurable.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Runs one request per declared endpoint, strictly one at a time.
pub struct ContractRunner {
    client: reqwest::blocking::Client,
}

impl ContractRunner {
    /// Build a runner with its HTTP client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be initialized.
    pub fn new() -> Result<Self, HarnessError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| HarnessError::Client(e.to_string()))?;
        Ok(Self { client })
    }

    /// Use a preconfigured client.
    #[must_use]
    pub fn with_client(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }

    /// One test case per endpoint, in enumeration order.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the document has no usable base URL.
    pub fn test_cases(doc: &SpecDocument) -> Result<Vec<TestCase>, LoadError> {
        let base_url = doc.base_url()?;
        Ok(doc
            .enumerate_endpoints()
            .into_iter()
            .map(|endpoint| TestCase::new(base_url, endpoint))
            .collect())
    }

    /// Describe what [`run_all`](Self::run_all) would send. No requests are made.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the document has no usable base URL.
    pub fn plan(doc: &SpecDocument) -> Result<RunPlan, LoadError> {
        let base_url = doc.base_url()?;
        Ok(RunPlan {
            base_url: base_url.to_string(),
            cases: Self::test_cases(doc)?,
            validations: vec![validate_base_url(base_url)],
        })
    }

    /// Execute every test case and collect the per-case reports.
    ///
    /// A failing or erroring case never stops the remaining ones.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] before any request is sent if the document has no
    /// usable base URL.
    pub fn run_all(&self, doc: &SpecDocument) -> Result<Vec<CaseReport>, LoadError> {
        let cases = Self::test_cases(doc)?;
        tracing::info!(cases = cases.len(), "running contract tests");

        Ok(cases.into_iter().map(|case| self.execute_one(case)).collect())
    }

    /// [`run_all`](Self::run_all) plus summary counts.
    ///
    /// # Errors
    ///
    /// Same as [`run_all`](Self::run_all).
    pub fn run(&self, doc: &SpecDocument) -> Result<RunReport, LoadError> {
        let base_url = doc.base_url()?.to_string();
        let report = RunReport::new(base_url, self.run_all(doc)?);
        tracing::info!(
            total = report.summary.total,
            passed = report.summary.passed,
            failed = report.summary.failed,
            errored = report.summary.errored,
            "contract tests finished"
        );
        Ok(report)
    }

    /// Send one case and evaluate its response.
    pub fn execute_one(&self, case: TestCase) -> CaseReport {
        let label = case.label();
        tracing::debug!(operation = %label, url = %case.request.url, "sending request");

        let start = Instant::now();
        let outcome = match self.send(&case.request) {
            Ok(observed) => CaseOutcome::Completed {
                result: checks::evaluate(&case.request, observed),
            },
            Err(error) => CaseOutcome::Errored { error },
        };
        let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        let report = CaseReport {
            endpoint: case.endpoint,
            request: case.request,
            outcome,
            elapsed_ms,
        };
        match report.reason() {
            None => tracing::info!(operation = %label, elapsed_ms, "passed"),
            Some(reason) => tracing::warn!(
                operation = %label,
                status = %report.status(),
                %reason,
                "did not pass"
            ),
        }
        report
    }

    /// Send a prepared request and capture status, body length and Content-Type.
    fn send(&self, request: &PreparedRequest) -> Result<ObservedResponse, RunError> {
        let method = reqwest::Method::from_bytes(request.method.to_wire().as_bytes())
            .map_err(|_| RunError::InvalidRequest {
                message: format!("invalid HTTP method '{}'", request.method.as_str()),
            })?;

        let mut req = self.client.request(method, &request.url);
        for (k, v) in &request.headers {
            req = req.header(k, v);
        }
        if let Some(body) = &request.body {
            req = req.body(body.clone());
        }

        let resp = req.send().map_err(classify_error)?;

        let status = resp.status().as_u16();
        // Capture headers before consuming the body
        // Non-ASCII values are kept lossily rather than reported as missing
        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());
        let body = resp.bytes().map_err(classify_error)?;

        Ok(ObservedResponse {
            status,
            body_len: body.len() as u64,
            content_type,
        })
    }
}

/// Map a transport error onto the per-case error taxonomy.
fn classify_error(e: reqwest::Error) -> RunError {
    let message = e.to_string();
    if e.is_timeout() {
        RunError::Timeout { message }
    } else if e.is_connect() {
        RunError::Connect { message }
    } else if e.is_builder() {
        RunError::InvalidRequest { message }
    } else {
        RunError::Transport { message }
    }
}

/// Failure to set up the runner itself. Load and per-case errors are reported separately.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("HTTP client error: {0}")]
    Client(String),
}
