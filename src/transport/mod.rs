//! # Transport seam to the clipboard service.
//!
//! The client never talks to the session bus directly; it goes through a
//! [`Transport`]. Calls are blocking and are executed by the client on the
//! runtime's blocking pool.
//!
//! ## Contract
//! - `connect` is called once per client connection, before any `invoke`.
//! - `invoke` performs one method call and returns the reply or a failure.
//! - `watch` registers a sink for `clipboardContentChanged`; the transport
//!   pushes the new content into it from whatever thread it pumps signals on.
//!   The client stops its signal pump on its own; a transport that keeps the
//!   sink after `disconnect` only wastes the sends.
//! - `disconnect` releases the connection and should drop registered sinks.

mod memory;

use std::fmt;
use std::sync::mpsc;

use serde_json::Value;

use crate::error::TransportError;

pub use memory::MemoryTransport;

/// Name of the signal raised when the clipboard content changes.
pub const CHANGE_SIGNAL: &str = "clipboardContentChanged";

/// Sink receiving new clipboard content from the transport's signal thread.
pub type ChangeSender = mpsc::Sender<String>;

/// Methods the client calls on the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// `getClipboardContents() -> s`
    GetClipboardContents,
    /// `setClipboardContents(s)`
    SetClipboardContents,
    /// `clearClipboardHistory()`
    ClearClipboardHistory,
}

impl Method {
    /// Member name on the service interface.
    pub fn member(self) -> &'static str {
        match self {
            Method::GetClipboardContents => "getClipboardContents",
            Method::SetClipboardContents => "setClipboardContents",
            Method::ClearClipboardHistory => "clearClipboardHistory",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.member())
    }
}

/// Blocking connection to a clipboard service.
pub trait Transport: Send + Sync + 'static {
    /// Opens the connection.
    fn connect(&self) -> Result<(), TransportError>;

    /// Calls `method` with `args`.
    fn invoke(&self, method: Method, args: &[Value]) -> Result<Value, TransportError>;

    /// Subscribes `sink` to content-change signals.
    fn watch(&self, sink: ChangeSender) -> Result<(), TransportError>;

    /// Closes the connection. Default: nothing to release.
    fn disconnect(&self) {}
}
