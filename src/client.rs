//! # Klipper client.
//!
//! [`KlipperClient`] owns the transport, the [`Classifier`] and the [`Relay`].
//! Every remote call goes through one wrapper:
//!
//! ```text
//! call(method, args)
//!   ├─► spawn_blocking(transport.invoke)   (optional timeout)
//!   │
//!   ├─ Ok(value) ─► classify(value) ─► commit ─► Ok(factual_content)
//!   └─ Err(err)  ─► classify(&err)  ─► commit ─► warn! ─► Err(err)   (unchanged)
//! ```
//!
//! On connect, a change sink is registered with the transport and a signal pump
//! thread (`klipper-signals`) forwards each change to the relay:
//!
//! ```text
//! transport ── String ──► [mpsc] ──► pump thread ──► relay.emit(content, Channel("clipboard_change"), 0.8)
//! ```
//!
//! The pump polls a client-owned stop flag, so `shutdown` and `Drop` end it
//! even when a transport keeps its sink.
//!
//! ## Offline mode
//! A client built with [`KlipperClient::offline`] has no transport: connecting
//! logs a warning, reads return empty values and writes are no-ops.

use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::{mpsc, Arc, Mutex, PoisonError};
use std::thread::JoinHandle;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::time;
use tracing::{debug, error, info, warn};

use crate::classifier::Classifier;
use crate::config::ClientConfig;
use crate::controllers::{ClipboardBackend, ClipboardController, HistoryManager};
use crate::error::{ClientError, TransportError};
use crate::relay::{Relay, Routing};
use crate::transport::{Method, Transport};

/// How often the signal pump checks its stop flag while idle.
const PUMP_POLL: Duration = Duration::from_millis(50);

/// Running signal pump: its thread and the flag that stops it.
struct Pump {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl Pump {
    fn stop(&self) {
        self.stop.store(true, AtomicOrdering::Release);
    }
}

/// Client for the Klipper clipboard service.
pub struct KlipperClient {
    config: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
    classifier: Classifier,
    relay: Arc<Relay>,
    connected: AtomicBool,
    connecting: tokio::sync::Mutex<()>,
    pump: Mutex<Option<Pump>>,
}

impl KlipperClient {
    /// Creates a client over `transport`. Nothing is contacted until the first call.
    pub fn new(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self::build(config, Some(transport))
    }

    /// Creates a client without a transport.
    pub fn offline(config: ClientConfig) -> Self {
        Self::build(config, None)
    }

    fn build(config: ClientConfig, transport: Option<Arc<dyn Transport>>) -> Self {
        let relay = Arc::new(Relay::new(config.app_id.clone()));
        Self {
            config,
            transport,
            classifier: Classifier::new(),
            relay,
            connected: AtomicBool::new(false),
            connecting: tokio::sync::Mutex::new(()),
            pump: Mutex::new(None),
        }
    }

    /// Client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The classifier applied to every call outcome.
    pub fn classifier(&self) -> Classifier {
        self.classifier
    }

    /// Relay carrying clipboard-change notifications.
    pub fn relay(&self) -> &Arc<Relay> {
        &self.relay
    }

    /// `true` once `connect` succeeded and until `shutdown`.
    pub fn is_connected(&self) -> bool {
        self.connected.load(AtomicOrdering::Acquire)
    }

    /// `true` when the client has no transport.
    pub fn is_offline(&self) -> bool {
        self.transport.is_none()
    }

    /// Current-clipboard operations.
    pub fn clipboard(self: &Arc<Self>) -> ClipboardController {
        ClipboardController::new(Arc::clone(self) as Arc<dyn ClipboardBackend>)
    }

    /// History operations.
    pub fn history(self: &Arc<Self>) -> HistoryManager {
        HistoryManager::new(Arc::clone(self) as Arc<dyn ClipboardBackend>)
            .with_default_limit(self.config.default_limit())
    }

    /// Opens the connection and starts the signal pump. Idempotent.
    ///
    /// ### Errors
    /// [`ClientError::Connect`] if the transport refuses; the failure is
    /// classified before it is returned.
    pub async fn connect(&self) -> Result<(), ClientError> {
        let _guard = self.connecting.lock().await;
        if self.is_connected() {
            return Ok(());
        }
        let Some(transport) = self.transport.clone() else {
            warn!("no transport configured; running in offline mode");
            return Ok(());
        };

        let (tx, rx) = mpsc::channel();
        let opened = self
            .run_blocking("connect", move || -> Result<(), TransportError> {
                transport.connect()?;
                transport.watch(tx)
            })
            .await
            .and_then(|r| r.map_err(|source| ClientError::Connect { source }))
            .and_then(|()| self.start_pump(rx));

        if let Err(err) = opened {
            let outcome = self.classifier.classify(&err);
            self.classifier.commit(&outcome);
            error!(label = err.as_label(), "failed to connect to klipper: {err}");
            return Err(err);
        }

        self.connected.store(true, AtomicOrdering::Release);
        info!(
            bus = %self.config.bus_name,
            path = %self.config.object_path,
            interface = %self.config.interface,
            "connected to klipper"
        );
        Ok(())
    }

    /// Calls `method` and returns the factual content of the reply.
    ///
    /// The reply (or failure) is classified and committed; on failure the
    /// original error is returned unchanged.
    pub async fn call(&self, method: Method, args: Vec<Value>) -> Result<Option<Value>, ClientError> {
        let transport = self.transport.clone().ok_or(ClientError::NotConnected)?;
        let member = method.member();

        let result = self
            .run_blocking(member, move || transport.invoke(method, &args))
            .await
            .and_then(|r| r.map_err(|source| ClientError::Transport { method: member, source }));

        match result {
            Ok(value) => {
                let outcome = self.classifier.classify(value);
                self.classifier.commit(&outcome);
                Ok(outcome.into_content())
            }
            Err(err) => {
                let outcome = self.classifier.classify(&err);
                self.classifier.commit(&outcome);
                warn!(
                    method = member,
                    label = err.as_label(),
                    diagnostic = ?outcome.diagnostic,
                    "call failed"
                );
                Err(err)
            }
        }
    }

    /// Current clipboard content (`""` when offline or empty).
    pub async fn get_clipboard_contents(&self) -> Result<String, ClientError> {
        self.ensure_connected().await?;
        if self.is_offline() {
            return Ok(String::new());
        }
        let content = self.call(Method::GetClipboardContents, Vec::new()).await?;
        Ok(content_text(content))
    }

    /// Replaces the clipboard content.
    pub async fn set_clipboard_contents(&self, text: &str) -> Result<(), ClientError> {
        self.ensure_connected().await?;
        if self.is_offline() {
            return Ok(());
        }
        self.call(Method::SetClipboardContents, vec![Value::String(text.to_string())])
            .await?;
        Ok(())
    }

    /// History view: the current content as a one-item list, `[]` when empty.
    ///
    /// Read failures are classified and yield `[]`; connect failures propagate.
    pub async fn get_history(&self) -> Result<Vec<String>, ClientError> {
        self.ensure_connected().await?;
        match self.get_clipboard_contents().await {
            Ok(current) if current.is_empty() => Ok(Vec::new()),
            Ok(current) => Ok(vec![current]),
            Err(err) => {
                let outcome = self.classifier.classify(&err);
                self.classifier.commit(&outcome);
                Ok(Vec::new())
            }
        }
    }

    /// Clears the service-side history.
    pub async fn clear_history(&self) -> Result<(), ClientError> {
        self.ensure_connected().await?;
        if self.is_offline() {
            return Ok(());
        }
        self.call(Method::ClearClipboardHistory, Vec::new()).await?;
        Ok(())
    }

    /// Disconnects the transport and waits for the signal pump to stop.
    pub async fn shutdown(&self) {
        let _guard = self.connecting.lock().await;
        let transport = self.transport.clone();
        let pump = self
            .pump
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(pump) = &pump {
            pump.stop();
        }

        let joined = tokio::task::spawn_blocking(move || {
            if let Some(t) = transport {
                t.disconnect();
            }
            if let Some(pump) = pump {
                let _ = pump.handle.join();
            }
        })
        .await;
        if let Err(err) = joined {
            warn!("shutdown worker failed: {err}");
        }

        self.connected.store(false, AtomicOrdering::Release);
        debug!("client shut down");
    }

    async fn ensure_connected(&self) -> Result<(), ClientError> {
        if self.is_connected() {
            Ok(())
        } else {
            self.connect().await
        }
    }

    /// Runs a blocking closure on the blocking pool, honoring the call timeout.
    ///
    /// On timeout the closure keeps running to completion in the background;
    /// its result is discarded.
    async fn run_blocking<T, F>(&self, method: &'static str, f: F) -> Result<T, ClientError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let handle = tokio::task::spawn_blocking(f);
        let joined = match self.config.call_timeout() {
            Some(limit) => time::timeout(limit, handle)
                .await
                .map_err(|_elapsed| ClientError::Timeout {
                    method,
                    timeout: limit,
                })?,
            None => handle.await,
        };
        joined.map_err(|e| ClientError::Worker {
            method,
            error: e.to_string(),
        })
    }

    fn start_pump(&self, rx: mpsc::Receiver<String>) -> Result<(), ClientError> {
        let relay = Arc::clone(&self.relay);
        let routing = Routing::channel(self.config.change_channel.clone());
        let weight = self.config.change_weight_clamped();
        let stop = Arc::new(AtomicBool::new(false));
        let stopped = Arc::clone(&stop);

        let handle = std::thread::Builder::new()
            .name("klipper-signals".to_string())
            .spawn(move || {
                debug!("signal pump started");
                while !stopped.load(AtomicOrdering::Acquire) {
                    let content = match rx.recv_timeout(PUMP_POLL) {
                        Ok(content) => content,
                        Err(mpsc::RecvTimeoutError::Timeout) => continue,
                        Err(mpsc::RecvTimeoutError::Disconnected) => break,
                    };
                    if stopped.load(AtomicOrdering::Acquire) {
                        break;
                    }
                    let delivery = relay.emit(content, routing.clone(), weight);
                    debug!(
                        id = %delivery.id,
                        delivered = delivery.delivered,
                        faults = delivery.faults.len(),
                        "clipboard change relayed"
                    );
                }
                debug!("signal pump stopped");
            })
            .map_err(|e| ClientError::Worker {
                method: "connect",
                error: e.to_string(),
            })?;

        let previous = self
            .pump
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(Pump { stop, handle });
        if let Some(old) = previous {
            old.stop();
            if old.handle.is_finished() {
                debug!("replaced a finished signal pump");
            } else {
                debug!("stopped a stale signal pump");
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ClipboardBackend for KlipperClient {
    async fn get_clipboard_contents(&self) -> Result<String, ClientError> {
        KlipperClient::get_clipboard_contents(self).await
    }

    async fn set_clipboard_contents(&self, text: &str) -> Result<(), ClientError> {
        KlipperClient::set_clipboard_contents(self, text).await
    }

    async fn get_history(&self) -> Result<Vec<String>, ClientError> {
        KlipperClient::get_history(self).await
    }

    async fn clear_history(&self) -> Result<(), ClientError> {
        KlipperClient::clear_history(self).await
    }
}

impl Drop for KlipperClient {
    /// Stops the signal pump without waiting for it and disconnects the
    /// transport. A client that was shut down has nothing left to release.
    fn drop(&mut self) {
        let pump = self
            .pump
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let Some(pump) = pump else {
            return;
        };
        pump.stop();
        if let Some(transport) = &self.transport {
            transport.disconnect();
        }
        debug!("client dropped while connected; signal pump detached");
    }
}

impl std::fmt::Debug for KlipperClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KlipperClient")
            .field("app_id", &self.config.app_id)
            .field("offline", &self.is_offline())
            .field("connected", &self.is_connected())
            .finish_non_exhaustive()
    }
}

/// Text carried by a reply's factual content.
///
/// Error-looking or empty text comes back wrapped as `{message, ..}`; the
/// original text is recovered from it.
fn content_text(content: Option<Value>) -> String {
    match content {
        Some(Value::String(text)) => text,
        Some(Value::Object(map)) => match map.get("message") {
            Some(Value::String(text)) => text.clone(),
            _ => String::new(),
        },
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
