//! Transport abstraction: executable requests and their factories.

use futures_util::future::BoxFuture;

use crate::error::HttpError;
use crate::request::RequestBuilder;
use crate::response::HttpResponse;

/// Result of one transport attempt.
pub type ExecuteFuture = BoxFuture<'static, Result<HttpResponse, HttpError>>;

/// A one-shot executable network call.
///
/// `execute` resolves with at most one response or one error and is never
/// polled again afterwards. Dropping the returned future aborts the attempt;
/// the dispatch pipeline relies on this for cancellation. HTTP error
/// statuses (4xx/5xx) resolve as ordinary responses, never as errors; a
/// transport timeout must surface as [`HttpError::Timeout`], every other
/// transport failure as [`HttpError::Transport`].
pub trait HttpRequest: Send + Sync {
    /// Perform the network call described at construction time.
    fn execute(&self) -> ExecuteFuture;
}

/// Builds executable requests for one transport target.
///
/// Construction must be pure: no I/O may happen before `execute` is invoked
/// on the returned request. The core never inspects which implementation is
/// active.
pub trait HttpRequestFactory: Send + Sync {
    /// Build an executable request from a merged request description.
    fn request(&self, builder: &RequestBuilder) -> Box<dyn HttpRequest>;
}

/// Default factory that fails every request.
///
/// Keeps an unconfigured system usable: dispatches complete with
/// [`HttpError::NoRequestFactory`] instead of panicking at startup.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyRequestFactory;

impl HttpRequestFactory for EmptyRequestFactory {
    fn request(&self, _builder: &RequestBuilder) -> Box<dyn HttpRequest> {
        Box::new(EmptyRequest)
    }
}

struct EmptyRequest;

impl HttpRequest for EmptyRequest {
    fn execute(&self) -> ExecuteFuture {
        Box::pin(async { Err(HttpError::NoRequestFactory) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_factory_fails_every_request() {
        let factory = EmptyRequestFactory;
        let request = factory.request(&RequestBuilder::new());

        let error = request.execute().await.unwrap_err();
        assert!(matches!(error, HttpError::NoRequestFactory));
    }
}
