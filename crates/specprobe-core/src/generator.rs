//! HTTP file generator - renders non-passing cases in .http format

use crate::report::CaseReport;
use crate::request::PreparedRequest;
use crate::verdict::CaseStatus;

/// Generate .http file content for every case that did not pass.
pub fn to_http_file(cases: &[CaseReport]) -> String {
    let unsuccessful: Vec<&CaseReport> = cases
        .iter()
        .filter(|c| c.status() != CaseStatus::Pass)
        .collect();

    let mut lines = Vec::new();
    lines.push(format!(
        "# Auto-generated reproduction cases ({} endpoints)",
        unsuccessful.len()
    ));
    lines.push(String::new());

    for (idx, case) in unsuccessful.iter().enumerate() {
        let comment = format!("[{idx}] {} {}", case.status(), case.endpoint.label());
        lines.push(request_to_http(&case.request, Some(&comment)));
        if let Some(reason) = case.reason() {
            lines.push(format!("# {reason}"));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

/// Generate a single request as .http format
pub fn request_to_http(request: &PreparedRequest, comment: Option<&str>) -> String {
    let mut lines = Vec::new();

    if let Some(c) = comment {
        lines.push(format!("### {c}"));
    }

    lines.push(format!("{} {}", request.method, request.url));

    for (key, value) in &request.headers {
        lines.push(format!("{key}: {value}"));
    }

    if let Some(body) = &request.body {
        lines.push(String::new());
        lines.push(body.clone());
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::HttpMethod;
    use crate::request::Endpoint;
    use crate::verdict::{CaseOutcome, ObservedResponse, Predicate, RunError, TestResult};

    fn failed_post() -> CaseReport {
        let observed = ObservedResponse {
            status: 200,
            body_len: 2,
            content_type: Some("application/json".into()),
        };
        CaseReport {
            endpoint: Endpoint::new("/echo", HttpMethod::Post),
            request: PreparedRequest::build(HttpMethod::Post, "http://localhost:8080/echo"),
            outcome: CaseOutcome::Completed {
                result: TestResult::fail(
                    Predicate::ContentTypeMatchesAcceptType,
                    observed,
                    Some("text/plain".into()),
                ),
            },
            elapsed_ms: 1,
        }
    }

    fn passed_get() -> CaseReport {
        let observed = ObservedResponse {
            status: 200,
            body_len: 2,
            content_type: Some("application/json".into()),
        };
        CaseReport {
            endpoint: Endpoint::new("/hello", HttpMethod::Get),
            request: PreparedRequest::build(HttpMethod::Get, "http://localhost:8080/hello"),
            outcome: CaseOutcome::Completed {
                result: TestResult::pass(observed, Some("application/json".into())),
            },
            elapsed_ms: 1,
        }
    }

    #[test]
    fn only_unsuccessful_cases_are_rendered() {
        let output = to_http_file(&[passed_get(), failed_post()]);

        assert!(output.contains("(1 endpoints)"));
        assert!(output.contains("### [0] FAIL POST /echo"));
        assert!(!output.contains("/hello"));
    }

    #[test]
    fn includes_headers_body_and_reason() {
        let output = to_http_file(&[failed_post()]);

        assert!(output.contains("POST http://localhost:8080/echo"));
        assert!(output.contains("Accept-Type: text/plain"));
        assert!(output.contains("Content-Type: text/plain"));
        assert!(output.contains("\nHello World"));
        assert!(output.contains(
            "# Content-Type matches Accept-Type: expected text/plain, got application/json"
        ));
    }

    #[test]
    fn errored_case_reason() {
        let mut case = passed_get();
        case.outcome = CaseOutcome::Errored {
            error: RunError::Connect {
                message: "connection refused".into(),
            },
        };
        let output = to_http_file(&[case]);

        assert!(output.contains("### [0] ERROR GET /hello"));
        assert!(output.contains("# connection failed: connection refused"));
    }

    #[test]
    fn request_to_http_basic() {
        let request = PreparedRequest::build(HttpMethod::Delete, "http://localhost/api");
        let output = request_to_http(&request, Some("Test request"));

        assert_eq!(output, "### Test request\nDELETE http://localhost/api");
    }
}
