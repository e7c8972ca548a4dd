//! HTTP request description and URL building.

use std::collections::HashMap;
use std::time::Duration;

use bytes::Bytes;
use serde::Serialize;
use url::form_urlencoded;

/// Reserved header names and common content types.
pub mod headers {
    /// Reserved header key: transports derive it from the body instead of
    /// forwarding it with the other headers.
    pub const CONTENT_TYPE: &str = "Content-Type";
    /// Default content type for text bodies.
    pub const CONTENT_TYPE_JSON: &str = "application/json";
    /// Default content type for byte bodies.
    pub const CONTENT_TYPE_OCTET_STREAM: &str = "application/octet-stream";
}

/// HTTP method of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
}

impl HttpMethod {
    /// Canonical method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
        }
    }
}

/// Request body payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpBody {
    /// Raw bytes, sent as `application/octet-stream` unless an explicit
    /// `Content-Type` header says otherwise.
    Bytes(Bytes),
    /// Text, sent as `application/json` unless an explicit `Content-Type`
    /// header says otherwise.
    Text(String),
}

/// Description of one HTTP request: URL parts, headers, method, body and
/// timeout.
///
/// Mutate-then-build usage: fill the fields, then call [`build_url`] any
/// number of times. Building is pure and performs no I/O; the dispatch
/// pipeline copies the builder before merging provider headers in, so a
/// caller-supplied builder is never mutated.
///
/// [`build_url`]: RequestBuilder::build_url
#[derive(Debug, Clone, Default)]
pub struct RequestBuilder {
    /// Scheme and authority; an empty base URL makes [`build_url`] return an
    /// empty string.
    ///
    /// [`build_url`]: RequestBuilder::build_url
    pub base_url: String,
    /// Path appended to the base URL, may already carry a query string.
    pub path: String,
    /// Query parameters, appended form-urlencoded in insertion order.
    pub parameters: Vec<(String, String)>,
    /// Request headers; keys are kept case-sensitive as given.
    pub headers: HashMap<String, String>,
    /// HTTP method, `GET` by default.
    pub method: HttpMethod,
    /// Optional request body.
    pub body: Option<HttpBody>,
    /// Per-request timeout override; zero counts as unset.
    pub timeout: Option<Duration>,
}

impl RequestBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the request URL from base URL, path and parameters.
    ///
    /// An empty base URL yields an empty string regardless of the other
    /// fields. Parameters are percent-encoded as form data (space becomes
    /// `+`) and joined with `&`; when the path already contains a `?` they
    /// are appended to the existing query string instead of starting a
    /// second one.
    pub fn build_url(&self) -> String {
        if self.base_url.is_empty() {
            return String::new();
        }

        let mut url = format!("{}{}", self.base_url, self.path);
        if !self.parameters.is_empty() {
            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(
                    self.parameters
                        .iter()
                        .map(|(name, value)| (name.as_str(), value.as_str())),
                )
                .finish();
            url.push(if self.path.contains('?') { '&' } else { '?' });
            url.push_str(&query);
        }
        url
    }
}

/// JSON request body wrapper.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<T: Serialize> JsonBody<T> {
    /// Serialize into a text body carrying JSON.
    pub fn to_body(&self) -> Result<HttpBody, serde_json::Error> {
        Ok(HttpBody::Text(serde_json::to_string(&self.0)?))
    }

    /// Serialize to JSON bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(&self.0)
    }
}
