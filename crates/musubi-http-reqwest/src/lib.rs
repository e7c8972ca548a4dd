//! reqwest transport adapter for musubi-http.
//!
//! Supplies the one [`musubi_http::HttpRequestFactory`] implementation for
//! desktop and server targets: a shared [`reqwest::Client`] wrapped behind
//! the core's transport contract.

pub mod client;
pub mod factory;

pub use client::{build_client, TransportConfig, TransportError};
pub use factory::ReqwestRequestFactory;
