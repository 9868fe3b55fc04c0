//! # Classifier input.
//!
//! A [`Signal`] wraps whatever came back from the service: a data value or a
//! failure. Failures are held by reference and rendered lazily, inside the
//! classifier's guard, so a misbehaving `Display` impl cannot escape it.
//!
//! ## Example
//! ```rust
//! use serde_json::json;
//! use klipper_client::{Payload, Signal};
//!
//! let s = Signal::from(json!({"key": "value"})).with_source("test");
//! assert!(matches!(s.payload, Payload::Data(_)));
//! assert_eq!(s.source.as_deref(), Some("test"));
//! ```

use std::error::Error as StdError;
use std::fmt;
use std::time::SystemTime;

use serde_json::Value;

use crate::error::ClientError;

/// A failure-shaped input.
#[derive(Clone, Copy)]
pub struct Failure<'a> {
    type_name: &'static str,
    error: &'a (dyn StdError + 'a),
}

impl<'a> Failure<'a> {
    /// Wraps an error, recording the short name of its type.
    pub fn of<E: StdError + 'a>(error: &'a E) -> Self {
        Self {
            type_name: short_type_name(std::any::type_name::<E>()),
            error,
        }
    }

    /// Wraps a type-erased error under an explicit type name.
    pub fn named(type_name: &'static str, error: &'a (dyn StdError + 'a)) -> Self {
        Self { type_name, error }
    }

    /// Short type name of the wrapped error (e.g. `ClientError`).
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Renders the error through its `Display` impl.
    ///
    /// May panic if the error's `Display` does; callers inside the classifier
    /// are guarded.
    pub(crate) fn render(&self) -> String {
        self.error.to_string()
    }
}

impl fmt::Debug for Failure<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Failure")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// What a signal carries.
#[derive(Debug, Clone)]
pub enum Payload<'a> {
    /// An ordinary value; `Value::Null` is the absent value.
    Data(Value),
    /// A failure raised by a collaborator.
    Failure(Failure<'a>),
}

/// Raw input to the classifier, with optional provenance.
#[derive(Debug, Clone)]
pub struct Signal<'a> {
    /// The value or failure being classified.
    pub payload: Payload<'a>,
    /// Who produced the signal, if known.
    pub source: Option<String>,
    /// When the signal was produced, if known.
    pub at: Option<SystemTime>,
}

impl<'a> Signal<'a> {
    /// Creates a signal without provenance.
    pub fn new(payload: Payload<'a>) -> Self {
        Self {
            payload,
            source: None,
            at: None,
        }
    }

    /// Attaches a source label.
    #[inline]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Attaches a timestamp.
    #[inline]
    pub fn with_timestamp(mut self, at: SystemTime) -> Self {
        self.at = Some(at);
        self
    }
}

impl From<Value> for Signal<'_> {
    fn from(value: Value) -> Self {
        Signal::new(Payload::Data(value))
    }
}

impl From<Option<Value>> for Signal<'_> {
    fn from(value: Option<Value>) -> Self {
        Signal::new(Payload::Data(value.unwrap_or(Value::Null)))
    }
}

impl From<&str> for Signal<'_> {
    fn from(text: &str) -> Self {
        Signal::new(Payload::Data(Value::String(text.to_string())))
    }
}

impl From<String> for Signal<'_> {
    fn from(text: String) -> Self {
        Signal::new(Payload::Data(Value::String(text)))
    }
}

impl<'a> From<Failure<'a>> for Signal<'a> {
    fn from(failure: Failure<'a>) -> Self {
        Signal::new(Payload::Failure(failure))
    }
}

impl<'a> From<Payload<'a>> for Signal<'a> {
    fn from(payload: Payload<'a>) -> Self {
        Signal::new(payload)
    }
}

impl<'a> From<&'a ClientError> for Signal<'a> {
    fn from(err: &'a ClientError) -> Self {
        Signal::new(Payload::Failure(Failure::of(err)))
    }
}

/// `a::b::Name<c::D>` → `Name`.
fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name("klipper_client::error::ClientError"), "ClientError");
        assert_eq!(short_type_name("alloc::vec::Vec<u8>"), "Vec");
        assert_eq!(short_type_name("Plain"), "Plain");
    }

    #[test]
    fn test_failure_of_client_error() {
        let err = ClientError::NotConnected;
        let failure = Failure::of(&err);
        assert_eq!(failure.type_name(), "ClientError");
        assert_eq!(failure.render(), "not connected to klipper");
    }

    #[test]
    fn test_signal_defaults_and_builders() {
        let at = SystemTime::UNIX_EPOCH;
        let s = Signal::from("test").with_source("test_source").with_timestamp(at);
        assert_eq!(s.source.as_deref(), Some("test_source"));
        assert_eq!(s.at, Some(at));

        let bare = Signal::from(None::<Value>);
        assert!(bare.source.is_none());
        assert!(bare.at.is_none());
        assert!(matches!(bare.payload, Payload::Data(Value::Null)));
    }
}
