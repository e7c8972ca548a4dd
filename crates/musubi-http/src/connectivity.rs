//! Network reachability signal.

use tokio::sync::watch;

/// Process-wide network reachability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectivityState {
    /// No network is reachable.
    None,
    /// Reachable over a cellular interface.
    Cellular,
    /// Reachable over Wi-Fi.
    Wifi,
    /// Reachability has not been determined; treated as reachable.
    #[default]
    Unknown,
}

impl ConnectivityState {
    /// Whether some network is believed to be available.
    pub fn is_reachable(self) -> bool {
        !matches!(self, ConnectivityState::None)
    }
}

/// Create a behavior-style connectivity channel seeded with `initial`.
///
/// The watch channel replays its latest value: observers that subscribe late
/// immediately see the most recent state. Platform integrations hold the
/// sender; the receiver side goes into the dispatch configuration.
pub fn connectivity_channel(
    initial: ConnectivityState,
) -> (
    watch::Sender<ConnectivityState>,
    watch::Receiver<ConnectivityState>,
) {
    watch::channel(initial)
}
