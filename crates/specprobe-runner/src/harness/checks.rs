//! Response predicates (3-check pipeline)
//!
//! No I/O. Checks run in a fixed order and the first failing one is reported.

use specprobe_core::{ObservedResponse, Predicate, PreparedRequest, TestResult};

/// Request header whose value the response Content-Type must echo.
pub(super) const ACCEPT_TYPE: &str = "Accept-Type";

/// Evaluate all predicates for one response.
pub(super) fn evaluate(request: &PreparedRequest, observed: ObservedResponse) -> TestResult {
    let expected_content_type = request.header(ACCEPT_TYPE).map(str::to_string);

    match first_failure(expected_content_type.as_deref(), &observed) {
        Some(predicate) => TestResult::fail(predicate, observed, expected_content_type),
        None => TestResult::pass(observed, expected_content_type),
    }
}

fn first_failure(
    expected_content_type: Option<&str>,
    observed: &ObservedResponse,
) -> Option<Predicate> {
    // ── Check 1: status ──
    if observed.status != 200 {
        return Some(Predicate::StatusOk);
    }

    // ── Check 2: non-empty body ──
    if observed.body_len == 0 {
        return Some(Predicate::NonEmptyBody);
    }

    // ── Check 3: Content-Type echoes Accept-Type (exact string, no media-type parsing) ──
    if let Some(expected) = expected_content_type {
        if observed.content_type.as_deref() != Some(expected) {
            return Some(Predicate::ContentTypeMatchesAcceptType);
        }
    }

    None
}
