//! HTTP method identifiers as they appear under an OpenAPI path item

use serde::{Deserialize, Serialize};

/// HTTP method declared for an endpoint.
///
/// Parsing is case-sensitive against the lowercase spelling OpenAPI uses.
/// Any other key (including `"GET"`) is kept verbatim in [`HttpMethod::Other`]
/// so that it still produces a request, just without a canned fixture.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
    Trace,
    Other(String),
}

impl HttpMethod {
    /// Parse a path-item key into a method.
    #[must_use]
    pub fn parse(key: &str) -> Self {
        match key {
            "get" => Self::Get,
            "post" => Self::Post,
            "put" => Self::Put,
            "delete" => Self::Delete,
            "patch" => Self::Patch,
            "head" => Self::Head,
            "options" => Self::Options,
            "trace" => Self::Trace,
            other => Self::Other(other.to_string()),
        }
    }

    /// Spelling as declared in the document.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Put => "put",
            Self::Delete => "delete",
            Self::Patch => "patch",
            Self::Head => "head",
            Self::Options => "options",
            Self::Trace => "trace",
            Self::Other(raw) => raw,
        }
    }

    /// Wire form, e.g. `"GET"`.
    #[must_use]
    pub fn to_wire(&self) -> String {
        self.as_str().to_ascii_uppercase()
    }
}

impl From<String> for HttpMethod {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<HttpMethod> for String {
    fn from(method: HttpMethod) -> Self {
        method.as_str().to_string()
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_wire())
    }
}
