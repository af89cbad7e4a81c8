//! Connectivity and app-lifecycle observer.
//!
//! Tracks whether the device is online and whether the app is in the
//! foreground, and notifies subscribers when either changes.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Current connectivity and lifecycle conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectivityState {
    /// Network is usable.
    pub online: bool,
    /// App is in the foreground.
    pub foreground: bool,
}

impl ConnectivityState {
    /// Online and foregrounded.
    pub const READY: Self = Self {
        online: true,
        foreground: true,
    };

    /// Offline, foregrounded.
    pub const OFFLINE: Self = Self {
        online: false,
        foreground: true,
    };

    /// Whether automatic draining is allowed.
    #[must_use]
    pub const fn can_drain(self) -> bool {
        self.online && self.foreground
    }
}

impl Default for ConnectivityState {
    fn default() -> Self {
        Self::READY
    }
}

/// Raw network report from the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NetworkStatus {
    /// An interface is connected.
    pub connected: bool,
    /// Internet reachability, if it has been determined.
    pub internet_reachable: Option<bool>,
}

impl NetworkStatus {
    /// Connected counts as online unless reachability is known to be false.
    #[must_use]
    pub const fn is_online(self) -> bool {
        self.connected && !matches!(self.internet_reachable, Some(false))
    }
}

/// App lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppState {
    /// Visible and interactive.
    Active,
    /// Transitioning or partially obscured.
    Inactive,
    /// Not visible.
    Background,
}

impl AppState {
    /// Only `Active` counts as foreground.
    #[must_use]
    pub const fn is_foreground(self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Publishes connectivity changes.
///
/// Subscribers see only actual changes; reporting the current value
/// again is silent.
#[derive(Debug)]
pub struct ConnectivityMonitor {
    tx: watch::Sender<ConnectivityState>,
}

impl ConnectivityMonitor {
    /// Create a monitor with an initial state.
    #[must_use]
    pub fn new(initial: ConnectivityState) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> ConnectivityState {
        *self.tx.borrow()
    }

    /// Receive future changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ConnectivityState> {
        self.tx.subscribe()
    }

    /// Set the online flag.
    pub fn set_online(&self, online: bool) {
        self.update(|state| state.online = online);
    }

    /// Set the foreground flag.
    pub fn set_foreground(&self, foreground: bool) {
        self.update(|state| state.foreground = foreground);
    }

    /// Apply a platform network report.
    pub fn report_network(&self, status: NetworkStatus) {
        self.set_online(status.is_online());
    }

    /// Apply a platform app-state transition.
    pub fn report_app_state(&self, app_state: AppState) {
        self.set_foreground(app_state.is_foreground());
    }

    fn update(&self, apply: impl FnOnce(&mut ConnectivityState)) {
        self.tx.send_if_modified(|state| {
            let before = *state;
            apply(state);
            if before == *state {
                false
            } else {
                tracing::debug!(
                    online = state.online,
                    foreground = state.foreground,
                    "Connectivity changed"
                );
                true
            }
        });
    }
}

impl Default for ConnectivityMonitor {
    fn default() -> Self {
        Self::new(ConnectivityState::default())
    }
}
