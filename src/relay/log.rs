//! # LogObserver — notification logger
//!
//! A minimal observer that records incoming [`Notification`]s through
//! `tracing`. Useful for demos and for debugging change propagation.
//!
//! ## Example output
//! ```text
//! INFO notification routing="clipboard_change" weight=0.8 origin="klipper-sdk" payload="hello"
//! ```

use tracing::info;

use super::notification::Notification;
use super::observe::Observe;
use crate::error::ObserverResult;

/// Notification logger.
#[derive(Default)]
pub struct LogObserver;

impl LogObserver {
    /// Construct a new [`LogObserver`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Observe for LogObserver {
    fn on_notification(&self, n: &Notification) -> ObserverResult {
        info!(
            id = %n.id,
            routing = n.routing.as_str(),
            weight = n.weight,
            origin = %n.origin,
            payload = %n.payload,
            "notification"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "LogObserver"
    }
}
