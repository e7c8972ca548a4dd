//! Per-request header injection.

use std::collections::HashMap;

use futures_util::future::BoxFuture;

use crate::error::HttpError;
use crate::request::RequestBuilder;

/// Headers contributed to a request.
pub type HttpHeaders = HashMap<String, String>;

/// Supplies default or derived headers for outgoing requests and observes
/// transport failures (token refresh, auth-error handling).
///
/// One provider instance is read concurrently by arbitrarily many in-flight
/// dispatches.
pub trait HttpHeaderProvider: Send + Sync {
    /// Headers to merge into the request described by `builder`.
    ///
    /// Provider headers override caller headers with the same key. A failure
    /// here terminates the dispatch before the transport is reached.
    fn headers_for(
        &self,
        builder: &RequestBuilder,
    ) -> BoxFuture<'static, Result<HttpHeaders, HttpError>>;

    /// Notification that the merged request failed at the transport level.
    ///
    /// Fire and forget; the dispatch outcome does not depend on it. Invoked
    /// before the connectivity state is consulted.
    fn on_request_failure(&self, builder: &RequestBuilder, error: &HttpError) {
        let _ = (builder, error);
    }
}

/// Default provider contributing no headers.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughHeaderProvider;

impl HttpHeaderProvider for PassthroughHeaderProvider {
    fn headers_for(
        &self,
        _builder: &RequestBuilder,
    ) -> BoxFuture<'static, Result<HttpHeaders, HttpError>> {
        Box::pin(async { Ok(HttpHeaders::new()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_passthrough_provider_contributes_nothing() {
        let provider = PassthroughHeaderProvider;
        let headers = provider.headers_for(&RequestBuilder::new()).await.unwrap();

        assert!(headers.is_empty());
    }
}
