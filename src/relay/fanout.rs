//! # Relay: synchronous fan-out with isolated observers.
//!
//! [`Relay`] owns an ordered observer list and delivers each notification to
//! every registered observer on the caller's thread.
//!
//! ## Architecture
//! ```text
//! emit(payload, routing, weight)
//!     │
//!     ├─► Notification { id, origin = node_id, .. }
//!     ├─► snapshot observers (read lock, released before delivery)
//!     │
//!     ├──► deliver ─► observer1.on_notification()
//!     ├──► deliver ─► observer2.on_notification() ─► Err / panic → RelayError (logged)
//!     └──► deliver ─► observerN.on_notification()
//! ```
//!
//! ## Rules
//! - **Ordered**: within one `emit`, observers are called in subscription order
//! - **Isolation**: a failing or panicking observer does not affect the others
//!   nor the emitter; the fault is logged and recorded in the [`Delivery`]
//! - **No retry**: a failed delivery is not attempted again
//! - **Snapshot**: observers added during an `emit` see the next one
//! - **Duplicates**: registering the same observer twice delivers twice
//!
//! ## Panic handling
//! `AssertUnwindSafe` is used, which can leave an observer's own shared state
//! inconsistent if it panics while holding a lock.
//! The process panic hook still runs for a caught panic, so with the default
//! hook the observer's panic message is also printed to stderr.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::Value;
use tracing::{debug, error};
use uuid::Uuid;

use super::notification::{Notification, Routing};
use super::observe::Observe;
use crate::error::{panic_message, RelayError};

/// Handle of one registration, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

struct Registration {
    id: ObserverId,
    observer: Arc<dyn Observe>,
}

/// Outcome of one `emit`.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    /// Id of the emitted notification.
    pub id: Uuid,
    /// Observers that handled the notification without fault.
    pub delivered: usize,
    /// Faults, in delivery order.
    pub faults: Vec<RelayError>,
}

impl Delivery {
    /// `true` when every observer handled the notification.
    pub fn is_clean(&self) -> bool {
        self.faults.is_empty()
    }
}

/// Publish/subscribe fan-out owned by one node.
pub struct Relay {
    node_id: String,
    next_id: AtomicU64,
    observers: RwLock<Vec<Registration>>,
}

impl Relay {
    /// Creates an empty relay for `node_id`.
    pub fn new(node_id: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            next_id: AtomicU64::new(0),
            observers: RwLock::new(Vec::new()),
        }
    }

    /// Id of the node that owns this relay.
    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    /// Appends an observer. No deduplication.
    pub fn subscribe(&self, observer: Arc<dyn Observe>) -> ObserverId {
        let id = ObserverId(self.next_id.fetch_add(1, AtomicOrdering::Relaxed));
        debug!(observer = observer.name(), "observer subscribed");
        self.write().push(Registration { id, observer });
        id
    }

    /// Removes one registration. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        let mut observers = self.write();
        match observers.iter().position(|r| r.id == id) {
            Some(idx) => {
                observers.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Number of registrations.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// `true` when no observer is registered.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Builds a notification and delivers it to every registered observer.
    ///
    /// Never fails because of an observer; faults are reported in the returned
    /// [`Delivery`].
    pub fn emit(&self, payload: impl Into<Value>, routing: Routing, weight: f64) -> Delivery {
        let notification = Notification::new(payload.into(), routing, weight, self.node_id.as_str());
        let snapshot: Vec<Arc<dyn Observe>> = self
            .read()
            .iter()
            .map(|r| Arc::clone(&r.observer))
            .collect();

        debug!(
            id = %notification.id,
            routing = notification.routing.as_str(),
            observers = snapshot.len(),
            "emitting notification"
        );

        let mut delivered = 0;
        let mut faults = Vec::new();
        for observer in &snapshot {
            match self.deliver(observer.as_ref(), &notification) {
                Ok(()) => delivered += 1,
                Err(fault) => faults.push(fault),
            }
        }

        Delivery {
            id: notification.id,
            delivered,
            faults,
        }
    }

    /// Emits with the default routing (`Broadcast`) and weight (`1.0`).
    pub fn broadcast(&self, payload: impl Into<Value>) -> Delivery {
        self.emit(payload, Routing::Broadcast, 1.0)
    }

    /// Delivers one notification to one observer inside a guarded scope.
    pub fn deliver(
        &self,
        observer: &dyn Observe,
        notification: &Notification,
    ) -> Result<(), RelayError> {
        let name = observer.name();
        let fault = match panic::catch_unwind(AssertUnwindSafe(|| {
            observer.on_notification(notification)
        })) {
            Ok(Ok(())) => return Ok(()),
            Ok(Err(err)) => RelayError::ObserverFailed {
                observer: name,
                error: err.to_string(),
            },
            Err(payload) => RelayError::ObserverPanicked {
                observer: name,
                info: panic_message(payload.as_ref()),
            },
        };

        error!(
            observer = name,
            id = %notification.id,
            label = fault.as_label(),
            "observer fault: {fault}"
        );
        Err(fault)
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Registration>> {
        self.observers.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Registration>> {
        self.observers.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Relay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Relay")
            .field("node_id", &self.node_id)
            .field("observers", &self.len())
            .finish()
    }
}
