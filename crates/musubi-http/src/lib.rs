//! Connectivity-aware HTTP request dispatch for Musubi.
//!
//! One asynchronous contract over interchangeable transports: describe a
//! request with [`RequestBuilder`], specialize [`HttpRequestOperation`] with a
//! response transform, and let [`HttpRequestPublisher`] inject provider
//! headers, execute the request through the configured
//! [`HttpRequestFactory`], and classify transport failures against the
//! process-wide connectivity signal.

pub mod cancel;
pub mod config;
pub mod connectivity;
pub mod error;
pub mod factory;
pub mod header;
pub mod publisher;
pub mod request;
pub mod response;

pub use cancel::CancellationScope;
pub use config::{DispatchQueue, HttpConfiguration, HttpConfigurationBuilder};
pub use connectivity::{connectivity_channel, ConnectivityState};
pub use error::{BoxError, ConfigurationConflict, HttpError};
pub use factory::{EmptyRequestFactory, ExecuteFuture, HttpRequest, HttpRequestFactory};
pub use header::{HttpHeaderProvider, HttpHeaders, PassthroughHeaderProvider};
pub use publisher::{
    HttpRequestOperation, HttpRequestPublisher, JsonRequestOperation, RawRequestOperation,
    ResponseFuture,
};
pub use request::{headers, HttpBody, HttpMethod, JsonBody, RequestBuilder};
pub use response::{parse_json, HttpResponse, ResponseSource};
