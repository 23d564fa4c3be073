//! Endpoints and fully resolved requests

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::fixture::fixture_for;
use crate::method::HttpMethod;

/// A (path, method) pair declared in the OpenAPI document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Endpoint {
    /// Path as declared, e.g. "/users"
    pub path: String,
    /// Method key as declared, e.g. "get"
    #[schemars(with = "String")]
    pub method: HttpMethod,
}

impl Endpoint {
    #[must_use]
    pub fn new(path: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            path: path.into(),
            method,
        }
    }

    /// Operation label, e.g. "GET /users"
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

/// A request ready to be sent. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PreparedRequest {
    #[schemars(with = "String")]
    pub method: HttpMethod,
    pub url: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl PreparedRequest {
    /// Build the request for `method` against `url` using the canned fixture table.
    ///
    /// Transport headers such as `Content-Length` are left to the HTTP client.
    #[must_use]
    pub fn build(method: HttpMethod, url: impl Into<String>) -> Self {
        let fixture = fixture_for(&method);
        let headers = fixture
            .headers
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();

        Self {
            method,
            url: url.into(),
            headers,
            body: fixture.body.map(str::to_string),
        }
    }

    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

/// One test case: the endpoint under test and the request that exercises it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TestCase {
    pub endpoint: Endpoint,
    pub request: PreparedRequest,
}

impl TestCase {
    /// Build the case for `endpoint`, targeting `base_url + path`.
    #[must_use]
    pub fn new(base_url: &str, endpoint: Endpoint) -> Self {
        let url = format!("{base_url}{}", endpoint.path);
        let request = PreparedRequest::build(endpoint.method.clone(), url);
        Self { endpoint, request }
    }

    #[must_use]
    pub fn label(&self) -> String {
        self.endpoint.label()
    }
}
