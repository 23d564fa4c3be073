//! Report output: terminal rendering and on-disk report files
//!
//! The JSON report is written only when a path is configured; nothing is
//! persisted by default.

use std::path::Path;

use specprobe_core::{CaseStatus, RunReport, Verdict, to_http_file};

/// Human-readable run summary.
pub fn to_terminal(report: &RunReport, verdict: &Verdict) -> String {
    let mut lines = Vec::new();

    lines.push(format!("Target: {}", report.base_url));
    lines.push(String::new());

    for case in &report.cases {
        lines.push(format!(
            "  {:<5} {} ({}ms)",
            case.status().to_string(),
            case.endpoint.label(),
            case.elapsed_ms
        ));
        if case.status() != CaseStatus::Pass {
            if let Some(reason) = case.reason() {
                lines.push(format!("        {reason}"));
            }
        }
    }

    lines.push(String::new());
    lines.push(format!("{}: {}", verdict.status, verdict.reason));
    lines.push(format!(
        "  Endpoints: {} total, {} passed, {} failed, {} errors",
        report.summary.total, report.summary.passed, report.summary.failed, report.summary.errored
    ));
    lines.push(format!("  Exit code: {}", verdict.exit_code));

    lines.join("\n")
}

/// JSON document combining the verdict and the full report.
pub fn to_json(report: &RunReport, verdict: &Verdict) -> serde_json::Value {
    serde_json::json!({
        "verdict": verdict,
        "report": report,
    })
}

/// Write the JSON report to `path`, creating parent directories.
pub fn save_report(path: &Path, report: &RunReport, verdict: &Verdict) -> std::io::Result<()> {
    ensure_parent(path)?;
    let json = serde_json::to_string_pretty(&to_json(report, verdict))
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    std::fs::write(path, json)
}

/// Write `.http` reproductions of non-passing cases to `path`.
///
/// Returns `false` without touching the filesystem when every case passed.
pub fn save_reproductions(path: &Path, report: &RunReport) -> std::io::Result<bool> {
    if report.unsuccessful().next().is_none() {
        return Ok(false);
    }
    ensure_parent(path)?;
    std::fs::write(path, to_http_file(&report.cases))?;
    Ok(true)
}

fn ensure_parent(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}
