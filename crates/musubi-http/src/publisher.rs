//! Request orchestration: header injection, execution, failure
//! classification.

use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use serde::de::DeserializeOwned;
use tokio::sync::oneshot;

use crate::cancel::CancellationScope;
use crate::config::HttpConfiguration;
use crate::connectivity::ConnectivityState;
use crate::error::HttpError;
use crate::header::HttpHeaders;
use crate::request::RequestBuilder;
use crate::response::{parse_json, HttpResponse};

/// One dispatchable request specialization: the request description plus the
/// transform applied to its response.
pub trait HttpRequestOperation: Send + 'static {
    /// Result produced from a completed response.
    type Output: Send + 'static;

    /// Description of the request to execute.
    ///
    /// Read once per dispatch; the returned builder is copied before
    /// provider headers are merged in and is never mutated.
    fn request_builder(&self) -> RequestBuilder;

    /// Transform the captured response into the operation result.
    ///
    /// Runs after the transport completed, whatever the status code; an
    /// error here terminates the dispatch as [`HttpError::Process`]-style
    /// failure without retry.
    fn process_response(&self, response: HttpResponse) -> Result<Self::Output, HttpError>;
}

/// Operation yielding the raw [`HttpResponse`].
#[derive(Debug, Clone)]
pub struct RawRequestOperation {
    builder: RequestBuilder,
}

impl RawRequestOperation {
    /// Operation executing `builder` without transforming the response.
    pub fn new(builder: RequestBuilder) -> Self {
        Self { builder }
    }
}

impl HttpRequestOperation for RawRequestOperation {
    type Output = HttpResponse;

    fn request_builder(&self) -> RequestBuilder {
        self.builder.clone()
    }

    fn process_response(&self, response: HttpResponse) -> Result<HttpResponse, HttpError> {
        Ok(response)
    }
}

/// Operation deserializing a JSON response body into `T`.
#[derive(Debug, Clone)]
pub struct JsonRequestOperation<T> {
    builder: RequestBuilder,
    _output: PhantomData<fn() -> T>,
}

impl<T> JsonRequestOperation<T> {
    /// Operation executing `builder` and decoding the body as JSON.
    pub fn new(builder: RequestBuilder) -> Self {
        Self {
            builder,
            _output: PhantomData,
        }
    }
}

impl<T> HttpRequestOperation for JsonRequestOperation<T>
where
    T: DeserializeOwned + Send + 'static,
{
    type Output = T;

    fn request_builder(&self) -> RequestBuilder {
        self.builder.clone()
    }

    fn process_response(&self, response: HttpResponse) -> Result<T, HttpError> {
        parse_json(&response)
    }
}

/// Terminal result channel of one dispatch.
///
/// Resolves with `None` when the scope was cancelled and nothing was
/// delivered; otherwise exactly one value or error is produced.
pub struct ResponseFuture<T> {
    receiver: oneshot::Receiver<Result<T, HttpError>>,
}

impl<T> Future for ResponseFuture<T> {
    type Output = Option<Result<T, HttpError>>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        Pin::new(&mut this.receiver).poll(cx).map(Result::ok)
    }
}

/// Orchestrates dispatches against a frozen [`HttpConfiguration`].
///
/// Each invocation runs as one sequential task: fetch provider headers,
/// merge them into a fresh builder, execute through the configured factory,
/// then either transform the response or classify the failure against the
/// connectivity signal. Invocations are independent; arbitrarily many may
/// overlap.
#[derive(Debug, Clone)]
pub struct HttpRequestPublisher {
    config: Arc<HttpConfiguration>,
}

impl HttpRequestPublisher {
    /// Publisher over a frozen configuration.
    pub fn new(config: Arc<HttpConfiguration>) -> Self {
        Self { config }
    }

    /// The configuration dispatches run against.
    pub fn config(&self) -> &Arc<HttpConfiguration> {
        &self.config
    }

    /// Dispatch one operation under `scope`.
    ///
    /// The invocation is spawned on the configured network queue (the
    /// ambient runtime when none is configured) and keeps running after the
    /// returned future is dropped. Cancelling the scope guarantees that no
    /// result or error reaches the returned future, at every asynchronous
    /// hop.
    pub fn dispatch<O>(&self, operation: O, scope: &CancellationScope) -> ResponseFuture<O::Output>
    where
        O: HttpRequestOperation,
    {
        let (sender, receiver) = oneshot::channel();
        let invocation = run_operation(operation, Arc::clone(&self.config), scope.clone(), sender);

        match self.config.network_queue() {
            Some(queue) => {
                queue.spawn(invocation);
            }
            None => {
                tokio::spawn(invocation);
            }
        }

        ResponseFuture { receiver }
    }
}

async fn run_operation<O>(
    operation: O,
    config: Arc<HttpConfiguration>,
    scope: CancellationScope,
    sender: oneshot::Sender<Result<O::Output, HttpError>>,
) where
    O: HttpRequestOperation,
{
    let caller = operation.request_builder();

    let fetched = match guard(&scope, config.header_provider().headers_for(&caller)).await {
        Some(fetched) => fetched,
        None => return,
    };
    let headers = match fetched {
        Ok(headers) => headers,
        Err(error) => {
            deliver(&scope, sender, Err(error));
            return;
        }
    };

    let merged = merge_with_headers(&caller, headers, config.base_url());
    tracing::debug!(
        method = merged.method.as_str(),
        url = %merged.build_url(),
        "dispatching request"
    );

    let request = config.request_factory().request(&merged);
    let outcome = match guard(&scope, request.execute()).await {
        Some(outcome) => outcome,
        None => return,
    };

    match outcome {
        Ok(response) => {
            tracing::debug!(status = response.status_code, "request completed");
            deliver(&scope, sender, operation.process_response(response));
        }
        Err(error) => {
            // The failure notification always happens before the
            // connectivity read.
            config.header_provider().on_request_failure(&merged, &error);

            let state = *config.connectivity().borrow();
            let error = if state == ConnectivityState::None {
                HttpError::NoInternetConnection(Box::new(error))
            } else {
                error
            };
            tracing::debug!(error = %error, "request failed");
            deliver(&scope, sender, Err(error));
        }
    }
}

/// Race one asynchronous hop against the scope.
///
/// `None` means the scope won: the hop is dropped, aborting whatever it was
/// doing, and nothing may be delivered downstream.
async fn guard<F>(scope: &CancellationScope, hop: F) -> Option<F::Output>
where
    F: Future,
{
    tokio::select! {
        _ = scope.cancelled() => None,
        output = hop => Some(output),
    }
}

fn deliver<T>(
    scope: &CancellationScope,
    sender: oneshot::Sender<Result<T, HttpError>>,
    result: Result<T, HttpError>,
) {
    if scope.is_cancelled() {
        return;
    }
    let _ = sender.send(result);
}

/// Fresh builder combining the caller's description with provider headers.
///
/// URL parts, method, body and timeout carry over verbatim; provider headers
/// override caller headers with the same key. An empty base URL takes the
/// configured default.
fn merge_with_headers(
    caller: &RequestBuilder,
    headers: HttpHeaders,
    default_base_url: &str,
) -> RequestBuilder {
    let mut merged = caller.clone();
    if merged.base_url.is_empty() {
        merged.base_url = default_base_url.to_string();
    }
    merged.headers.extend(headers);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_overrides_caller_headers() {
        let mut caller = RequestBuilder::new();
        caller.headers.insert("X-Common".to_string(), "caller".to_string());
        caller.headers.insert("X-Caller".to_string(), "1".to_string());

        let mut provided = HttpHeaders::new();
        provided.insert("X-Common".to_string(), "provider".to_string());
        provided.insert("Authorization".to_string(), "Bearer token".to_string());

        let merged = merge_with_headers(&caller, provided, "");

        assert_eq!(merged.headers["X-Common"], "provider");
        assert_eq!(merged.headers["X-Caller"], "1");
        assert_eq!(merged.headers["Authorization"], "Bearer token");
        assert!(caller.headers.get("Authorization").is_none());
    }

    #[test]
    fn test_merge_applies_default_base_url_only_when_empty() {
        let mut caller = RequestBuilder::new();
        caller.path = "/api".to_string();
        caller.parameters = vec![("a".to_string(), "b".to_string())];

        let merged = merge_with_headers(&caller, HttpHeaders::new(), "https://api.example.com");
        assert_eq!(merged.base_url, "https://api.example.com");
        assert_eq!(merged.parameters, caller.parameters);

        caller.base_url = "https://other.example.com".to_string();
        let merged = merge_with_headers(&caller, HttpHeaders::new(), "https://api.example.com");
        assert_eq!(merged.base_url, "https://other.example.com");
    }
}
