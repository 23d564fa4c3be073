//! Canned request fixtures, looked up by HTTP method
//!
//! Used in place of examples or schemas from the document to keep requests simple.
//! Methods without an entry get [`Fixture::EMPTY`].

use crate::method::HttpMethod;

/// Headers and optional body attached to every request of one method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fixture {
    pub headers: &'static [(&'static str, &'static str)],
    pub body: Option<&'static str>,
}

impl Fixture {
    /// No headers, no body.
    pub const EMPTY: Self = Self {
        headers: &[],
        body: None,
    };

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.body.is_none()
    }
}

const GET: Fixture = Fixture {
    headers: &[("Accept-Type", "application/json")],
    body: None,
};

const POST: Fixture = Fixture {
    headers: &[("Accept-Type", "text/plain"), ("Content-Type", "text/plain")],
    body: Some("Hello World"),
};

/// Fixture for `method`. Never fails: unlisted methods get the empty fixture.
#[must_use]
pub fn fixture_for(method: &HttpMethod) -> Fixture {
    match method {
        HttpMethod::Get => GET,
        HttpMethod::Post => POST,
        _ => Fixture::EMPTY,
    }
}
