//! # In-process clipboard service.
//!
//! [`MemoryTransport`] behaves like the Klipper service closely enough for
//! tests and demos: it keeps the current content and a history list, raises
//! change signals on every write, and can be told to be unreachable, to fail a
//! method, or to answer slowly.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use super::{ChangeSender, Method, Transport};
use crate::error::TransportError;

#[derive(Default)]
struct State {
    unavailable: Option<String>,
    connected: bool,
    current: String,
    history: Vec<String>,
    watchers: Vec<ChangeSender>,
    faults: HashMap<Method, TransportError>,
    latency: Duration,
}

/// In-memory stand-in for the clipboard service.
#[derive(Default)]
pub struct MemoryTransport {
    state: Mutex<State>,
}

impl MemoryTransport {
    /// Empty clipboard, reachable.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clipboard pre-filled with `text`.
    pub fn with_content(text: impl Into<String>) -> Self {
        let text = text.into();
        let transport = Self::new();
        {
            let mut state = transport.lock();
            state.history.push(text.clone());
            state.current = text;
        }
        transport
    }

    /// A service that refuses every connection.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        let transport = Self::new();
        transport.lock().unavailable = Some(reason.into());
        transport
    }

    /// Makes every call to `method` fail with `error`.
    pub fn fail_on(&self, method: Method, error: TransportError) {
        self.lock().faults.insert(method, error);
    }

    /// Removes every injected failure.
    pub fn clear_faults(&self) {
        self.lock().faults.clear();
    }

    /// Delays every call by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        self.lock().latency = latency;
    }

    /// Simulates another application copying `text`.
    pub fn copy_external(&self, text: impl Into<String>) {
        let mut state = self.lock();
        store(&mut state, text.into());
    }

    /// Current clipboard content.
    pub fn current(&self) -> String {
        self.lock().current.clone()
    }

    /// History, most recent first.
    pub fn history(&self) -> Vec<String> {
        self.lock().history.iter().rev().cloned().collect()
    }

    /// Number of live change sinks.
    pub fn watcher_count(&self) -> usize {
        self.lock().watchers.len()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Transport for MemoryTransport {
    fn connect(&self) -> Result<(), TransportError> {
        let mut state = self.lock();
        if let Some(reason) = &state.unavailable {
            return Err(TransportError::Unavailable {
                reason: reason.clone(),
            });
        }
        state.connected = true;
        Ok(())
    }

    fn invoke(&self, method: Method, args: &[Value]) -> Result<Value, TransportError> {
        let latency = self.lock().latency;
        if !latency.is_zero() {
            std::thread::sleep(latency);
        }

        let mut state = self.lock();
        if !state.connected {
            return Err(TransportError::Unavailable {
                reason: "not connected".to_string(),
            });
        }
        if let Some(fault) = state.faults.get(&method) {
            return Err(fault.clone());
        }
        debug!(method = method.member(), args = args.len(), "memory transport call");

        match method {
            Method::GetClipboardContents => Ok(Value::String(state.current.clone())),
            Method::SetClipboardContents => match args {
                [Value::String(text)] => {
                    store(&mut state, text.clone());
                    Ok(Value::Null)
                }
                _ => Err(TransportError::InvalidArgs {
                    method: method.member().to_string(),
                    reason: "expected a single string".to_string(),
                }),
            },
            Method::ClearClipboardHistory => {
                state.history.clear();
                state.current.clear();
                notify(&mut state, String::new());
                Ok(Value::Null)
            }
        }
    }

    fn watch(&self, sink: ChangeSender) -> Result<(), TransportError> {
        let mut state = self.lock();
        if !state.connected {
            return Err(TransportError::Unavailable {
                reason: "not connected".to_string(),
            });
        }
        state.watchers.push(sink);
        Ok(())
    }

    fn disconnect(&self) {
        let mut state = self.lock();
        state.connected = false;
        state.watchers.clear();
    }
}

fn store(state: &mut State, text: String) {
    if !text.is_empty() {
        state.history.push(text.clone());
    }
    state.current = text.clone();
    notify(state, text);
}

/// Sends `text` to every watcher, dropping the ones whose receiver is gone.
fn notify(state: &mut State, text: String) {
    state.watchers.retain(|w| w.send(text.clone()).is_ok());
}
