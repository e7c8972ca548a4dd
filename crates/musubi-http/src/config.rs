//! Shared dispatch configuration.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::connectivity::{connectivity_channel, ConnectivityState};
use crate::error::ConfigurationConflict;
use crate::factory::{EmptyRequestFactory, HttpRequestFactory};
use crate::header::{HttpHeaderProvider, PassthroughHeaderProvider};

/// Queue on which dispatch invocations run.
#[derive(Debug, Clone)]
pub struct DispatchQueue {
    handle: Handle,
}

impl DispatchQueue {
    /// Queue backed by an explicit runtime handle.
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Queue backed by the current runtime.
    ///
    /// # Panics
    ///
    /// Panics outside a tokio runtime, like [`Handle::current`].
    pub fn current() -> Self {
        Self {
            handle: Handle::current(),
        }
    }

    pub(crate) fn spawn<F>(&self, future: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.handle.spawn(future)
    }
}

/// Immutable process-wide dispatch configuration.
///
/// Built once via [`HttpConfiguration::builder`], then shared behind an
/// `Arc`: concurrent readers are always safe because nothing can change
/// after [`build`]. Every slot has a graceful default, so an unconfigured
/// system degrades (requests fail with a distinct error) instead of
/// crashing at startup.
///
/// [`build`]: HttpConfigurationBuilder::build
#[derive(Clone)]
pub struct HttpConfiguration {
    request_factory: Arc<dyn HttpRequestFactory>,
    network_queue: Option<Arc<DispatchQueue>>,
    header_provider: Arc<dyn HttpHeaderProvider>,
    connectivity: watch::Receiver<ConnectivityState>,
    base_url: String,
}

impl HttpConfiguration {
    /// Start building a configuration.
    pub fn builder() -> HttpConfigurationBuilder {
        HttpConfigurationBuilder::default()
    }

    /// Shared transport factory.
    pub fn request_factory(&self) -> &Arc<dyn HttpRequestFactory> {
        &self.request_factory
    }

    /// Queue dispatch invocations are spawned on; `None` means the ambient
    /// runtime.
    pub fn network_queue(&self) -> Option<&Arc<DispatchQueue>> {
        self.network_queue.as_ref()
    }

    /// Default header provider consulted for every dispatch.
    pub fn header_provider(&self) -> &Arc<dyn HttpHeaderProvider> {
        &self.header_provider
    }

    /// Latest-value connectivity signal.
    pub fn connectivity(&self) -> &watch::Receiver<ConnectivityState> {
        &self.connectivity
    }

    /// Base URL applied to builders that carry an empty one.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for HttpConfiguration {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl fmt::Debug for HttpConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpConfiguration")
            .field("base_url", &self.base_url)
            .field("has_network_queue", &self.network_queue.is_some())
            .field("connectivity", &*self.connectivity.borrow())
            .finish()
    }
}

/// Builder enforcing set-once-per-slot semantics before the configuration
/// freezes.
///
/// Re-assigning a slot with the value it already holds succeeds; a different
/// value is a [`ConfigurationConflict`]. Shared values compare by identity
/// (`Arc` pointer, watch channel), the base URL by string equality.
#[derive(Default)]
pub struct HttpConfigurationBuilder {
    request_factory: Option<Arc<dyn HttpRequestFactory>>,
    network_queue: Option<Arc<DispatchQueue>>,
    header_provider: Option<Arc<dyn HttpHeaderProvider>>,
    connectivity: Option<watch::Receiver<ConnectivityState>>,
    base_url: Option<String>,
}

impl fmt::Debug for HttpConfigurationBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpConfigurationBuilder")
            .field("has_request_factory", &self.request_factory.is_some())
            .field("has_network_queue", &self.network_queue.is_some())
            .field("has_header_provider", &self.header_provider.is_some())
            .field("has_connectivity", &self.connectivity.is_some())
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl HttpConfigurationBuilder {
    /// Set the transport factory.
    pub fn request_factory(
        mut self,
        factory: Arc<dyn HttpRequestFactory>,
    ) -> Result<Self, ConfigurationConflict> {
        match &self.request_factory {
            Some(current) if !Arc::ptr_eq(current, &factory) => Err(ConfigurationConflict {
                slot: "request_factory",
            }),
            _ => {
                self.request_factory = Some(factory);
                Ok(self)
            }
        }
    }

    /// Set the queue dispatch invocations are spawned on.
    pub fn network_queue(
        mut self,
        queue: Arc<DispatchQueue>,
    ) -> Result<Self, ConfigurationConflict> {
        match &self.network_queue {
            Some(current) if !Arc::ptr_eq(current, &queue) => Err(ConfigurationConflict {
                slot: "network_queue",
            }),
            _ => {
                self.network_queue = Some(queue);
                Ok(self)
            }
        }
    }

    /// Set the default header provider.
    pub fn header_provider(
        mut self,
        provider: Arc<dyn HttpHeaderProvider>,
    ) -> Result<Self, ConfigurationConflict> {
        match &self.header_provider {
            Some(current) if !Arc::ptr_eq(current, &provider) => Err(ConfigurationConflict {
                slot: "header_provider",
            }),
            _ => {
                self.header_provider = Some(provider);
                Ok(self)
            }
        }
    }

    /// Set the connectivity signal.
    pub fn connectivity(
        mut self,
        receiver: watch::Receiver<ConnectivityState>,
    ) -> Result<Self, ConfigurationConflict> {
        match &self.connectivity {
            Some(current) if !current.same_channel(&receiver) => Err(ConfigurationConflict {
                slot: "connectivity",
            }),
            _ => {
                self.connectivity = Some(receiver);
                Ok(self)
            }
        }
    }

    /// Set the default base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Result<Self, ConfigurationConflict> {
        let base_url = base_url.into();
        match &self.base_url {
            Some(current) if *current != base_url => {
                Err(ConfigurationConflict { slot: "base_url" })
            }
            _ => {
                self.base_url = Some(base_url);
                Ok(self)
            }
        }
    }

    /// Freeze the configuration, filling unset slots with graceful defaults.
    pub fn build(self) -> HttpConfiguration {
        let connectivity = self.connectivity.unwrap_or_else(|| {
            // No platform integration: the signal stays on Unknown forever.
            let (_sender, receiver) = connectivity_channel(ConnectivityState::Unknown);
            receiver
        });

        HttpConfiguration {
            request_factory: self
                .request_factory
                .unwrap_or_else(|| Arc::new(EmptyRequestFactory)),
            network_queue: self.network_queue,
            header_provider: self
                .header_provider
                .unwrap_or_else(|| Arc::new(PassthroughHeaderProvider)),
            connectivity,
            base_url: self.base_url.unwrap_or_default(),
        }
    }
}
