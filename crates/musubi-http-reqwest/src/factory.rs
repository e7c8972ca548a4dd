//! reqwest-backed request factory.

use std::collections::HashMap;

use musubi_http::{
    headers, ExecuteFuture, HttpBody, HttpError, HttpMethod, HttpRequest, HttpRequestFactory,
    HttpResponse, RequestBuilder, ResponseSource,
};

use crate::client::{build_client, TransportConfig, TransportError};

/// [`HttpRequestFactory`] backed by a shared [`reqwest::Client`].
///
/// Construction is pure: `request` only copies the builder next to a client
/// handle, no I/O happens before `execute`.
pub struct ReqwestRequestFactory {
    client: reqwest::Client,
}

impl ReqwestRequestFactory {
    /// Factory with the default transport configuration.
    pub fn new() -> Result<Self, TransportError> {
        Self::with_config(TransportConfig::default())
    }

    /// Factory with a custom transport configuration.
    pub fn with_config(config: TransportConfig) -> Result<Self, TransportError> {
        Ok(Self {
            client: build_client(config)?,
        })
    }

    /// Factory over an existing client.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl HttpRequestFactory for ReqwestRequestFactory {
    fn request(&self, builder: &RequestBuilder) -> Box<dyn HttpRequest> {
        Box::new(ReqwestHttpRequest {
            client: self.client.clone(),
            builder: builder.clone(),
        })
    }
}

/// One-shot executable request over reqwest.
struct ReqwestHttpRequest {
    client: reqwest::Client,
    builder: RequestBuilder,
}

impl HttpRequest for ReqwestHttpRequest {
    fn execute(&self) -> ExecuteFuture {
        let request = to_reqwest(&self.client, &self.builder);
        Box::pin(async move {
            let response = request.send().await.map_err(classify)?;
            tracing::debug!(status = response.status().as_u16(), "transport completed");
            capture(response).await
        })
    }
}

fn method_of(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
        HttpMethod::Head => reqwest::Method::HEAD,
    }
}

fn to_reqwest(client: &reqwest::Client, builder: &RequestBuilder) -> reqwest::RequestBuilder {
    let url = builder.build_url();
    tracing::debug!(method = builder.method.as_str(), %url, "sending request");

    let mut request = client.request(method_of(builder.method), url);

    // Content-Type is reserved: it is derived from the body below, never
    // forwarded with the plain headers.
    for (name, value) in &builder.headers {
        if name != headers::CONTENT_TYPE {
            request = request.header(name.as_str(), value.as_str());
        }
    }

    let explicit = builder.headers.get(headers::CONTENT_TYPE).map(String::as_str);
    match &builder.body {
        Some(HttpBody::Bytes(bytes)) => {
            request = request
                .header(
                    headers::CONTENT_TYPE,
                    explicit.unwrap_or(headers::CONTENT_TYPE_OCTET_STREAM),
                )
                .body(bytes.clone());
        }
        Some(HttpBody::Text(text)) => {
            request = request
                .header(
                    headers::CONTENT_TYPE,
                    explicit.unwrap_or(headers::CONTENT_TYPE_JSON),
                )
                .body(text.clone());
        }
        None => {}
    }

    if let Some(timeout) = builder.timeout.filter(|timeout| !timeout.is_zero()) {
        request = request.timeout(timeout);
    }

    request
}

fn classify(error: reqwest::Error) -> HttpError {
    if error.is_timeout() {
        HttpError::Timeout {
            source: Some(Box::new(error)),
        }
    } else {
        HttpError::Transport(Box::new(error))
    }
}

/// Wrap a raw transport response into the canonical shape, whatever the
/// status code.
async fn capture(response: reqwest::Response) -> Result<HttpResponse, HttpError> {
    let status_code = response.status().as_u16();
    let captured_headers = capture_headers(response.headers());
    let body = response.bytes().await.map_err(classify)?;

    Ok(HttpResponse {
        status_code,
        body: Some(body),
        headers: captured_headers,
        source: ResponseSource::Network,
    })
}

/// Flatten response headers; values that are not valid UTF-8 are converted
/// lossily rather than dropped.
fn capture_headers(headers: &reqwest::header::HeaderMap) -> HashMap<String, String> {
    let mut captured = HashMap::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes()).to_string();
        captured.insert(name.as_str().to_string(), value);
    }
    captured
}
