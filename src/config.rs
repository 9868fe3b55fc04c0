//! # Client configuration.
//!
//! Provides [`ClientConfig`], the centralized settings for [`KlipperClient`](crate::KlipperClient).
//!
//! ## Sentinel values
//! - `call_timeout = 0s` → no timeout on remote calls
//! - `history_limit = 0` → unlimited recent-items view

use std::time::Duration;

/// Configuration for a Klipper client.
///
/// ## Field semantics
/// - `app_id`: identifies this client; also the origin of relay notifications
/// - `bus_name` / `object_path` / `interface`: where the service lives on the session bus
/// - `call_timeout`: per-call timeout (`0s` = none)
/// - `history_limit`: default size of the recent-items view (`0` = unlimited)
/// - `change_channel` / `change_weight`: routing and weight of clipboard-change notifications
///
/// ## Notes
/// All fields are public. Prefer the accessors to avoid sprinkling sentinel
/// checks (`0`) across the codebase.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Client identifier, used as the relay node id.
    pub app_id: String,

    /// Well-known bus name of the clipboard service.
    pub bus_name: String,

    /// Object path of the clipboard service.
    pub object_path: String,

    /// Interface exposing the clipboard methods.
    pub interface: String,

    /// Timeout applied to each remote call.
    ///
    /// - `Duration::ZERO` = wait for the call to complete
    /// - `> 0` = the call fails with `ClientError::Timeout` once exceeded
    pub call_timeout: Duration,

    /// Default number of items returned by the recent-items view.
    pub history_limit: usize,

    /// Channel name used when relaying clipboard changes.
    pub change_channel: String,

    /// Weight attached to clipboard-change notifications.
    pub change_weight: f64,
}

impl ClientConfig {
    /// Returns the call timeout as an `Option`.
    ///
    /// - `None` → no timeout
    /// - `Some(d)` → timeout applied per call
    #[inline]
    pub fn call_timeout(&self) -> Option<Duration> {
        if self.call_timeout == Duration::ZERO {
            None
        } else {
            Some(self.call_timeout)
        }
    }

    /// Returns the default recent-items limit as an `Option`.
    #[inline]
    pub fn default_limit(&self) -> Option<usize> {
        if self.history_limit == 0 {
            None
        } else {
            Some(self.history_limit)
        }
    }

    /// Returns the change weight clamped to `[0.0, 1.0]`.
    #[inline]
    pub fn change_weight_clamped(&self) -> f64 {
        crate::relay::clamp_weight(self.change_weight)
    }

    /// Returns a copy with a different application id.
    #[must_use]
    pub fn with_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = app_id.into();
        self
    }

    /// Returns a copy with a different call timeout.
    #[must_use]
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    /// Default configuration:
    ///
    /// - `app_id = "klipper-sdk"`
    /// - `bus_name = "org.kde.klipper"`, `object_path = "/klipper"`,
    ///   `interface = "org.kde.klipper.klipper"`
    /// - `call_timeout = 5s`
    /// - `history_limit = 10`
    /// - `change_channel = "clipboard_change"`, `change_weight = 0.8`
    fn default() -> Self {
        Self {
            app_id: "klipper-sdk".to_string(),
            bus_name: "org.kde.klipper".to_string(),
            object_path: "/klipper".to_string(),
            interface: "org.kde.klipper.klipper".to_string(),
            call_timeout: Duration::from_secs(5),
            history_limit: 10,
            change_channel: "clipboard_change".to_string(),
            change_weight: 0.8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.app_id, "klipper-sdk");
        assert_eq!(cfg.interface, "org.kde.klipper.klipper");
        assert_eq!(cfg.call_timeout(), Some(Duration::from_secs(5)));
        assert_eq!(cfg.default_limit(), Some(10));
        assert_eq!(cfg.change_weight_clamped(), 0.8);
    }

    #[test]
    fn test_sentinels() {
        let mut cfg = ClientConfig::default().with_call_timeout(Duration::ZERO);
        cfg.history_limit = 0;
        cfg.change_weight = 3.0;
        assert_eq!(cfg.call_timeout(), None);
        assert_eq!(cfg.default_limit(), None);
        assert_eq!(cfg.change_weight_clamped(), 1.0);
    }
}
