//! Error taxonomy for request dispatch.

/// Boxed cause reported by a transport or provider.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors produced by the dispatch pipeline.
///
/// All classification happens in the orchestrator or the transport adapter;
/// no variant is ever derived from an HTTP status code, and nothing in this
/// layer retries.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// The header provider failed; the transport was never reached.
    #[error("header provider failed: {0}")]
    HeaderProvider(#[source] BoxError),

    /// A dispatch went through a configuration that never received a
    /// request factory.
    #[error("no request factory configured")]
    NoRequestFactory,

    /// Transport-level failure with connectivity present.
    #[error("request failed: {0}")]
    Transport(#[source] BoxError),

    /// The transport reported a timeout.
    #[error("request timed out")]
    Timeout {
        #[source]
        source: Option<BoxError>,
    },

    /// Transport-level failure while the connectivity state was `None`;
    /// wraps the original cause.
    #[error("no internet connection")]
    NoInternetConnection(#[source] Box<HttpError>),

    /// The caller's response transform failed.
    #[error("response processing failed: {0}")]
    Process(#[source] BoxError),

    /// A JSON response body did not deserialize.
    #[error("failed to parse JSON (status {status}): {source}")]
    Parse {
        status: u16,
        body: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Configure-once guard violation: a configuration slot was re-assigned with
/// a different value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("configuration slot `{slot}` is already set to a different value")]
pub struct ConfigurationConflict {
    /// Name of the slot that was re-assigned.
    pub slot: &'static str,
}
