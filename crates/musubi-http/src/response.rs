//! HTTP response types.

use std::collections::HashMap;

use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::error::HttpError;

/// Where a captured response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseSource {
    /// The transport did not report a provenance.
    #[default]
    Unknown,
    /// Served from a transport-level cache.
    Cache,
    /// Fetched over the network.
    Network,
}

/// Immutable result of one completed transport attempt.
///
/// Created exactly once per attempt and never reused. The status code is
/// captured as-is: 4xx/5xx responses are ordinary data at this layer, never
/// execution errors.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status_code: u16,
    /// Raw response body, if any.
    pub body: Option<Bytes>,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Provenance tag supplied by the transport.
    pub source: ResponseSource,
}

impl HttpResponse {
    /// Whether the status code is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// Deserialize a JSON response body.
pub fn parse_json<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, HttpError> {
    let bytes = response.body.as_deref().unwrap_or_default();

    serde_json::from_slice(bytes).map_err(|source| HttpError::Parse {
        status: response.status_code,
        body: String::from_utf8_lossy(bytes).to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct TestData {
        message: String,
        value: i32,
    }

    fn response_with_body(status_code: u16, body: &'static [u8]) -> HttpResponse {
        HttpResponse {
            status_code,
            body: Some(Bytes::from_static(body)),
            headers: HashMap::new(),
            source: ResponseSource::Network,
        }
    }

    #[test]
    fn test_is_success() {
        assert!(response_with_body(200, b"").is_success());
        assert!(response_with_body(204, b"").is_success());
        assert!(!response_with_body(302, b"").is_success());
        assert!(!response_with_body(404, b"").is_success());
    }

    #[test]
    fn test_parse_json() {
        let response = response_with_body(200, b"{\"message\":\"hello\",\"value\":42}");
        let data: TestData = parse_json(&response).unwrap();

        assert_eq!(
            data,
            TestData {
                message: "hello".to_string(),
                value: 42
            }
        );
    }

    #[test]
    fn test_parse_json_reports_status_and_body() {
        let response = response_with_body(502, b"upstream down");
        let error = parse_json::<TestData>(&response).unwrap_err();

        match error {
            HttpError::Parse { status, body, .. } => {
                assert_eq!(status, 502);
                assert_eq!(body, "upstream down");
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_json_missing_body() {
        let response = HttpResponse {
            status_code: 204,
            body: None,
            headers: HashMap::new(),
            source: ResponseSource::Unknown,
        };

        assert!(parse_json::<TestData>(&response).is_err());
    }
}
