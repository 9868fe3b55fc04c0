//! # Core observer trait
//!
//! `Observe` is the extension point for reacting to relay notifications.
//! Observers are called synchronously, in subscription order, on the thread
//! that emits.
//!
//! ## Contract
//! - Keep handlers short; a slow observer delays the ones after it.
//! - Returning `Err` or panicking is isolated: the fault is logged and the
//!   remaining observers still receive the notification.
//!
//! ## Example
//! ```rust
//! use klipper_client::{Notification, Observe, ObserverResult};
//!
//! struct Audit;
//!
//! impl Observe for Audit {
//!     fn on_notification(&self, n: &Notification) -> ObserverResult {
//!         let _ = n.payload.as_str();
//!         Ok(())
//!     }
//!     fn name(&self) -> &'static str { "audit" }
//! }
//! ```

use std::sync::Arc;

use super::notification::Notification;
use crate::error::ObserverResult;

/// Contract for relay observers.
pub trait Observe: Send + Sync + 'static {
    /// Handle a single notification.
    fn on_notification(&self, notification: &Notification) -> ObserverResult;

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Closure-backed observer.
///
/// ## Example
/// ```rust
/// use std::sync::Arc;
/// use klipper_client::{ObserverFn, Relay};
///
/// let relay = Relay::new("node");
/// relay.subscribe(ObserverFn::arc("printer", |n| {
///     println!("{}", n.payload);
///     Ok(())
/// }));
/// assert_eq!(relay.len(), 1);
/// ```
pub struct ObserverFn<F> {
    name: &'static str,
    f: F,
}

impl<F> ObserverFn<F>
where
    F: Fn(&Notification) -> ObserverResult + Send + Sync + 'static,
{
    /// Wraps a closure.
    pub fn new(name: &'static str, f: F) -> Self {
        Self { name, f }
    }

    /// Wraps a closure and returns it as a shared handle.
    pub fn arc(name: &'static str, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<F> Observe for ObserverFn<F>
where
    F: Fn(&Notification) -> ObserverResult + Send + Sync + 'static,
{
    fn on_notification(&self, notification: &Notification) -> ObserverResult {
        (self.f)(notification)
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
