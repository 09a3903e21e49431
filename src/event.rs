//! Event: the normalized request/response shape every handler speaks.
//!
//! ARCHITECTURE
//! ============
//! Handlers never see the hosting surface. The HTTP front end and the
//! `invoke` subcommand both normalize their input into an [`Event`]
//! (method, raw body, query map) and turn the returned [`Reply`] back into
//! whatever the caller expects.
//!
//! DESIGN
//! ======
//! - Field names on the wire are camelCase (`httpMethod`, `statusCode`).
//! - The reply body is always a JSON string, except for preflight replies
//!   which carry an empty body.
//! - Bodies are decoded lazily by the handler into its own typed request.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::num::ParseIntError;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

// =============================================================================
// STATUS + HEADER CONSTANTS
// =============================================================================

pub const STATUS_OK: u16 = 200;
pub const STATUS_CREATED: u16 = 201;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_UNAUTHORIZED: u16 = 401;
pub const STATUS_NOT_FOUND: u16 = 404;
pub const STATUS_METHOD_NOT_ALLOWED: u16 = 405;

pub const HEADER_ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
pub const HEADER_ALLOW_METHODS: &str = "Access-Control-Allow-Methods";
pub const HEADER_ALLOW_HEADERS: &str = "Access-Control-Allow-Headers";
pub const HEADER_MAX_AGE: &str = "Access-Control-Max-Age";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";

const PREFLIGHT_MAX_AGE: &str = "86400";
const JSON_CONTENT_TYPE: &str = "application/json";

// =============================================================================
// METHOD
// =============================================================================

/// HTTP method of an inbound event. Anything unrecognized maps to `Other`
/// so dispatchers can fall through to their invalid-request reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
    Other,
}

impl Method {
    /// Parse a method name case-insensitively.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "GET" => Self::Get,
            "POST" => Self::Post,
            "PUT" => Self::Put,
            "PATCH" => Self::Patch,
            "DELETE" => Self::Delete,
            "HEAD" => Self::Head,
            "OPTIONS" => Self::Options,
            _ => Self::Other,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
            Self::Other => "OTHER",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// EVENT
// =============================================================================

fn default_method() -> String {
    "GET".to_owned()
}

/// Inbound request as delivered by the invoking platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(default = "default_method")]
    pub http_method: String,
    /// JSON-encoded request body, if any.
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub query_string_parameters: Option<HashMap<String, String>>,
}

impl Event {
    #[must_use]
    pub fn method(&self) -> Method {
        Method::parse(&self.http_method)
    }

    /// Query parameter by name. Empty values count as absent.
    #[must_use]
    pub fn query(&self, key: &str) -> Option<&str> {
        self.query_string_parameters
            .as_ref()
            .and_then(|params| params.get(key))
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    /// Integer id from the query string.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameter is present but not an integer.
    pub fn query_id(&self, key: &str) -> Result<Option<i32>, ParseIntError> {
        self.query(key).map(|raw| raw.trim().parse::<i32>()).transpose()
    }

    /// Decode the body into a typed request. A missing or blank body decodes
    /// as `{}` so required fields still surface as errors.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid JSON or does not match `T`.
    pub fn decode_body<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        let raw = self
            .body
            .as_deref()
            .filter(|body| !body.trim().is_empty())
            .unwrap_or("{}");
        serde_json::from_str(raw)
    }
}

/// Builders for constructing events in tests.
#[cfg(test)]
impl Event {
    /// Build an event with no body and no query parameters.
    pub fn new(method: impl Into<String>) -> Self {
        Self { http_method: method.into(), body: None, query_string_parameters: None }
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    #[must_use]
    pub fn with_json(self, body: &serde_json::Value) -> Self {
        self.with_body(body.to_string())
    }

    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_string_parameters
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }
}

// =============================================================================
// REPLY
// =============================================================================

/// CORS preflight settings advertised by one handler module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preflight {
    pub allow_methods: &'static str,
    pub allow_headers: &'static str,
}

/// Outbound response handed back to the invoking platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

fn json_headers() -> BTreeMap<String, String> {
    BTreeMap::from([
        (HEADER_CONTENT_TYPE.to_owned(), JSON_CONTENT_TYPE.to_owned()),
        (HEADER_ALLOW_ORIGIN.to_owned(), "*".to_owned()),
    ])
}

impl Reply {
    /// JSON reply with the common CORS header set.
    ///
    /// # Errors
    ///
    /// Returns an error if `payload` fails to serialize.
    pub fn json<T: Serialize + ?Sized>(status_code: u16, payload: &T) -> Result<Self, serde_json::Error> {
        Ok(Self { status_code, headers: json_headers(), body: serde_json::to_string(payload)? })
    }

    /// `{"error": message}` reply.
    #[must_use]
    pub fn error(status_code: u16, message: &str) -> Self {
        Self {
            status_code,
            headers: json_headers(),
            body: serde_json::json!({ "error": message }).to_string(),
        }
    }

    /// Empty-bodied 200 answering an `OPTIONS` request.
    #[must_use]
    pub fn preflight(preflight: &Preflight) -> Self {
        let headers = BTreeMap::from([
            (HEADER_ALLOW_ORIGIN.to_owned(), "*".to_owned()),
            (HEADER_ALLOW_METHODS.to_owned(), preflight.allow_methods.to_owned()),
            (HEADER_ALLOW_HEADERS.to_owned(), preflight.allow_headers.to_owned()),
            (HEADER_MAX_AGE.to_owned(), PREFLIGHT_MAX_AGE.to_owned()),
        ]);
        Self { status_code: STATUS_OK, headers, body: String::new() }
    }
}

#[cfg(test)]
impl Reply {
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Parse the body back into JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid JSON.
    pub fn body_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

#[cfg(test)]
#[path = "event_test.rs"]
mod tests;
