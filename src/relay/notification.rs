//! # Notifications carried by the relay.
//!
//! A [`Notification`] is built once per `emit`, delivered synchronously to the
//! current observers, then dropped. The relay keeps no history.
//!
//! ## Example
//! ```rust
//! use klipper_client::{Notification, Routing};
//!
//! let n = Notification::new("x".into(), Routing::channel("clipboard_change"), 0.8, "node-a");
//! assert_eq!(n.routing.as_str(), "clipboard_change");
//! assert_eq!(n.origin, "node-a");
//! ```

use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// How a notification is meant to be routed. The relay itself delivers every
/// notification to every observer; routing is advisory for observers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Routing {
    /// Meant for every observer.
    #[default]
    Broadcast,
    /// Meant for a specific observer.
    Targeted,
    /// A conventional named route (e.g. `clipboard_change`).
    Channel(String),
}

impl Routing {
    /// Named route.
    pub fn channel(name: impl Into<String>) -> Self {
        Routing::Channel(name.into())
    }

    /// Stable name of the route.
    pub fn as_str(&self) -> &str {
        match self {
            Routing::Broadcast => "broadcast",
            Routing::Targeted => "targeted",
            Routing::Channel(name) => name,
        }
    }
}

/// A single relayed message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Unique per emission.
    pub id: Uuid,
    /// Arbitrary payload.
    pub payload: Value,
    /// Routing tag.
    pub routing: Routing,
    /// Caller-assigned importance in `[0.0, 1.0]`; not interpreted by the relay.
    pub weight: f64,
    /// Node id of the emitting relay.
    pub origin: String,
    /// Emission time.
    pub at: SystemTime,
}

impl Notification {
    /// Builds a notification with a fresh id; `weight` is clamped to `[0.0, 1.0]`.
    pub fn new(payload: Value, routing: Routing, weight: f64, origin: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            payload,
            routing,
            weight: clamp_weight(weight),
            origin: origin.into(),
            at: SystemTime::now(),
        }
    }
}

/// Clamps a weight into `[0.0, 1.0]`. NaN becomes the default weight `1.0`.
#[inline]
pub(crate) fn clamp_weight(weight: f64) -> f64 {
    if weight.is_nan() {
        1.0
    } else {
        weight.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_is_clamped() {
        assert_eq!(clamp_weight(0.8), 0.8);
        assert_eq!(clamp_weight(-1.0), 0.0);
        assert_eq!(clamp_weight(7.5), 1.0);
        assert_eq!(clamp_weight(f64::NAN), 1.0);
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Notification::new(Value::Null, Routing::default(), 1.0, "n");
        let b = Notification::new(Value::Null, Routing::default(), 1.0, "n");
        assert_ne!(a.id, b.id);
        assert_eq!(a.routing, Routing::Broadcast);
    }

    #[test]
    fn test_routing_serializes_snake_case() {
        let v = serde_json::to_value(Routing::Targeted).unwrap();
        assert_eq!(v, "targeted");
        let v = serde_json::to_value(Routing::channel("clipboard_change")).unwrap();
        assert_eq!(v, serde_json::json!({"channel": "clipboard_change"}));
    }
}
