//! End-to-end runs against a local tiny_http server
//!
//! Each test serves a fixed number of requests, records what arrived, and
//! checks both the request the harness sent and the verdict it reached.

use std::io::{Cursor, Read, Write};
use std::net::TcpListener;
use std::thread;
use std::time::Duration;

use specprobe_core::{
    CaseOutcome, CaseStatus, HttpMethod, Predicate, RunError, verdict::EXIT_ASSERTION_FAILURE,
};
use specprobe_runner::{ContractRunner, HarnessError, LoadError, SpecDocument, SpecFormat};
use tiny_http::{Header, Response, Server};

// ── Test helpers ──

/// A request as seen by the test server.
#[derive(Debug)]
struct Received {
    method: String,
    url: String,
    headers: Vec<(String, String)>,
    body: String,
}

impl Received {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Serve exactly `n` requests, answering each with `respond`.
fn serve<F>(n: usize, respond: F) -> (String, thread::JoinHandle<Vec<Received>>)
where
    F: Fn(&Received) -> Response<Cursor<Vec<u8>>> + Send + 'static,
{
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let base = format!("http://{addr}");

    let handle = thread::spawn(move || {
        let mut seen = Vec::new();
        for _ in 0..n {
            let mut request = server.recv().unwrap();
            let mut body = String::new();
            request.as_reader().read_to_string(&mut body).unwrap();
            let received = Received {
                method: request.method().to_string(),
                url: request.url().to_string(),
                headers: request
                    .headers()
                    .iter()
                    .map(|h| (h.field.to_string(), h.value.to_string()))
                    .collect(),
                body,
            };
            request.respond(respond(&received)).unwrap();
            seen.push(received);
        }
        seen
    });

    (base, handle)
}

fn reply(status: u16, body: &str, content_type: Option<&str>) -> Response<Cursor<Vec<u8>>> {
    let mut response = Response::from_data(body.as_bytes().to_vec()).with_status_code(status);
    if let Some(ct) = content_type {
        response.add_header(Header::from_bytes(&b"Content-Type"[..], ct.as_bytes()).unwrap());
    }
    response
}

fn spec(base: &str, paths: &str) -> SpecDocument {
    let doc = format!("servers:\n  - url: {base}\npaths:\n{paths}");
    SpecDocument::parse(&doc, SpecFormat::Yaml).unwrap()
}

fn runner() -> ContractRunner {
    ContractRunner::new().unwrap()
}

/// A port with nothing listening on it.
fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

// ── Scenarios ──

#[test]
fn get_endpoint_with_json_response_passes() {
    let (base, handle) = serve(1, |_| reply(200, r#"{"hello":"world"}"#, Some("application/json")));
    let doc = spec(&base, "  /hello:\n    get: {}\n");

    let cases = runner().run_all(&doc).unwrap();
    let seen = handle.join().unwrap();

    assert_eq!(cases.len(), 1);
    assert_eq!(cases[0].status(), CaseStatus::Pass);
    assert_eq!(cases[0].request.url, format!("{base}/hello"));

    assert_eq!(seen[0].method, "GET");
    assert_eq!(seen[0].url, "/hello");
    assert_eq!(seen[0].header("Accept-Type"), Some("application/json"));
    assert!(seen[0].body.is_empty());
}

#[test]
fn post_endpoint_sends_plain_text_fixture() {
    let (base, handle) = serve(1, |req| reply(200, &req.body, Some("text/plain")));
    let doc = spec(&base, "  /echo:\n    post: {}\n");

    let cases = runner().run_all(&doc).unwrap();
    let seen = handle.join().unwrap();

    assert_eq!(cases[0].status(), CaseStatus::Pass);
    assert_eq!(seen[0].method, "POST");
    assert_eq!(seen[0].header("Accept-Type"), Some("text/plain"));
    assert_eq!(seen[0].header("Content-Type"), Some("text/plain"));
    assert_eq!(seen[0].body, "Hello World");
}

#[test]
fn post_endpoint_answering_json_fails_content_type() {
    let (base, handle) = serve(1, |_| reply(200, "{}", Some("application/json")));
    let doc = spec(&base, "  /echo:\n    post: {}\n");

    let cases = runner().run_all(&doc).unwrap();
    handle.join().unwrap();

    let CaseOutcome::Completed { result } = &cases[0].outcome else {
        panic!("expected a completed case, got {:?}", cases[0].outcome);
    };
    assert!(!result.passed);
    assert_eq!(
        result.failed_predicate,
        Some(Predicate::ContentTypeMatchesAcceptType)
    );
    let observed = result.observed_values.as_ref().unwrap();
    assert_eq!(observed.status, 200);
    assert_eq!(observed.content_type.as_deref(), Some("application/json"));
}

#[test]
fn missing_servers_aborts_before_any_request() {
    let doc = SpecDocument::parse("paths:\n  /hello:\n    get: {}\n", SpecFormat::Yaml).unwrap();

    let err = runner().run_all(&doc).unwrap_err();
    assert!(matches!(err, LoadError::MissingServers));
    assert!(ContractRunner::plan(&doc).is_err());
}

#[test]
fn method_without_fixture_sends_bare_request() {
    let (base, handle) = serve(1, |_| reply(200, "patched", Some("application/xml")));
    let doc = spec(&base, "  /admin:\n    patch: {}\n");

    let cases = runner().run_all(&doc).unwrap();
    let seen = handle.join().unwrap();

    assert_eq!(cases.len(), 1);
    assert_eq!(cases[0].endpoint.method, HttpMethod::Patch);
    assert_eq!(cases[0].status(), CaseStatus::Pass);

    assert_eq!(seen[0].method, "PATCH");
    assert!(seen[0].header("Accept-Type").is_none());
    assert!(seen[0].body.is_empty());
}

// ── Independence and aggregation ──

#[test]
fn failing_cases_do_not_stop_the_run() {
    let (base, handle) = serve(3, |req| match req.url.as_str() {
        "/missing" => reply(404, "not found", Some("text/plain")),
        "/empty" => reply(200, "", Some("application/json")),
        _ => reply(200, "[]", Some("application/json")),
    });
    let doc = spec(
        &base,
        "  /missing:\n    get: {}\n  /empty:\n    get: {}\n  /ok:\n    get: {}\n",
    );

    let report = runner().run(&doc).unwrap();
    let seen = handle.join().unwrap();

    let urls: Vec<&str> = seen.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(urls, vec!["/missing", "/empty", "/ok"]);

    let predicates: Vec<Option<Predicate>> = report
        .cases
        .iter()
        .map(|c| match &c.outcome {
            CaseOutcome::Completed { result } => result.failed_predicate,
            CaseOutcome::Errored { .. } => panic!("unexpected transport error"),
        })
        .collect();
    assert_eq!(
        predicates,
        vec![Some(Predicate::StatusOk), Some(Predicate::NonEmptyBody), None]
    );

    assert_eq!(report.summary.total, 3);
    assert_eq!(report.summary.passed, 1);
    assert_eq!(report.summary.failed, 2);
    assert_eq!(report.verdict().exit_code, EXIT_ASSERTION_FAILURE);
}

#[test]
fn empty_paths_pass_vacuously() {
    let doc = spec("http://127.0.0.1:9", "  {}\n");

    let report = runner().run(&doc).unwrap();
    assert_eq!(report.summary.total, 0);
    assert_eq!(report.verdict().exit_code, 0);
}

// ── Transport errors ──

#[test]
fn connection_refused_is_a_run_error_for_every_case() {
    let doc = spec(&closed_port_url(), "  /a:\n    get: {}\n  /b:\n    post: {}\n");

    let report = runner().run(&doc).unwrap();

    assert_eq!(report.cases.len(), 2);
    for case in &report.cases {
        assert!(
            matches!(
                case.outcome,
                CaseOutcome::Errored {
                    error: RunError::Connect { .. }
                }
            ),
            "expected connect error, got {:?}",
            case.outcome
        );
    }
    assert_eq!(report.summary.errored, 2);
    assert_eq!(report.verdict().exit_code, 2);
}

#[test]
fn dropped_connection_errors_one_case_and_the_next_still_runs() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        // First connection: read the request, then hang up without answering
        let (mut stream, _) = listener.accept().unwrap();
        let mut buf = [0u8; 1024];
        let _ = stream.read(&mut buf);
        drop(stream);

        // Second connection: answer properly
        let (mut stream, _) = listener.accept().unwrap();
        let _ = stream.read(&mut buf);
        let _ = stream.write_all(
            b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 2\r\nConnection: close\r\n\r\n{}",
        );
        let _ = stream.flush();
    });

    let doc = spec(&base, "  /first:\n    get: {}\n  /second:\n    get: {}\n");
    let report = runner().run(&doc).unwrap();
    handle.join().unwrap();

    assert_eq!(report.cases[0].status(), CaseStatus::Error);
    assert_eq!(report.cases[1].status(), CaseStatus::Pass);
}

#[test]
fn slow_server_is_a_timeout() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        thread::sleep(Duration::from_millis(1500));
        drop(stream);
    });

    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();
    let doc = spec(&base, "  /slow:\n    get: {}\n");
    let cases = ContractRunner::with_client(client).run_all(&doc).unwrap();
    handle.join().unwrap();

    assert!(
        matches!(
            cases[0].outcome,
            CaseOutcome::Errored {
                error: RunError::Timeout { .. }
            }
        ),
        "expected timeout, got {:?}",
        cases[0].outcome
    );
}

#[test]
fn unparseable_base_url_is_an_invalid_request() {
    let doc = spec("not a url", "  /hello:\n    get: {}\n");

    let cases = runner().run_all(&doc).unwrap();
    assert!(matches!(
        cases[0].outcome,
        CaseOutcome::Errored {
            error: RunError::InvalidRequest { .. }
        }
    ));
}

#[test]
fn non_ascii_content_type_is_recorded_not_missing() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut buf = [0u8; 1024];
        let _ = stream.read(&mut buf);
        let _ = stream.write_all(
            b"HTTP/1.1 200 OK\r\nContent-Type: text/plain; name=caf\xe9\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok",
        );
        let _ = stream.flush();
    });

    let doc = spec(&base, "  /echo:\n    post: {}\n");
    let cases = runner().run_all(&doc).unwrap();
    handle.join().unwrap();

    let CaseOutcome::Completed { result } = &cases[0].outcome else {
        panic!("expected a completed case, got {:?}", cases[0].outcome);
    };
    assert_eq!(
        result.failed_predicate,
        Some(Predicate::ContentTypeMatchesAcceptType)
    );
    let observed = result.observed_values.as_ref().unwrap();
    let content_type = observed.content_type.as_deref().unwrap();
    assert!(content_type.starts_with("text/plain; name=caf"));
    let failure = result.assertion_failure().unwrap();
    assert_ne!(failure.observed, "<missing>");
}

// ── Setup ──

#[test]
fn client_setup_error_is_the_only_harness_error() {
    assert!(ContractRunner::new().is_ok());

    let err = HarnessError::Client("tls backend unavailable".into());
    assert_eq!(err.to_string(), "HTTP client error: tls backend unavailable");
}

// ── Plan ──

#[test]
fn plan_lists_cases_without_sending() {
    let doc = spec(
        "http://localhost:8080",
        "  /hello:\n    get: {}\n  /echo:\n    post: {}\n",
    );

    let plan = ContractRunner::plan(&doc).unwrap();
    let urls: Vec<&str> = plan.cases.iter().map(|c| c.request.url.as_str()).collect();
    assert_eq!(
        urls,
        vec!["http://localhost:8080/hello", "http://localhost:8080/echo"]
    );
    assert!(!plan.has_errors());
}
