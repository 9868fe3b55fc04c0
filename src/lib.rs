//! # klipper-client
//!
//! **klipper-client** talks to the KDE Klipper clipboard-history service.
//!
//! It exposes get / set / clear on the current clipboard and a paginated view
//! over history, classifies every value and every failure returned by the
//! service, and relays clipboard-change signals to registered observers.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!          ClipboardController        HistoryManager
//!                    │                      │
//!                    └──────────┬───────────┘
//!                               ▼ (ClipboardBackend)
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  KlipperClient                                                    │
//! │  - call(): spawn_blocking(invoke) + timeout                       │
//! │  - Classifier (classify + commit on success AND failure paths)    │
//! │  - Relay (observers of clipboard changes)                         │
//! └──────┬───────────────────────────────────────────────▲────────────┘
//!        │ invoke(method, args)                          │ relay.emit
//!        ▼                                               │
//! ┌──────────────────────────┐  clipboardContentChanged ┌┴─────────────────┐
//! │  Transport               │ ───────── mpsc ─────────►│ klipper-signals  │
//! │  (MemoryTransport, ...)  │                          │ (pump thread)    │
//! └──────────────────────────┘                          └──────────────────┘
//! ```
//!
//! ### Classification
//! ```text
//! value | failure ─► classify ─┬─ coherent:  content = value
//!                              └─ entropic:  Diagnostic { kind, raw_rendering, context, note }
//!                                            + best-effort content
//!   kinds: Exception | StringError | EmptySignal | PrismInternal
//! ```
//!
//! ## Features
//! | Area              | Description                                              | Key types / traits                         |
//! |-------------------|----------------------------------------------------------|--------------------------------------------|
//! | **Classifier**    | Total classification of results and failures.            | [`Classifier`], [`ClassificationOutcome`]  |
//! | **Relay**         | Ordered fan-out with isolated observer faults.           | [`Relay`], [`Observe`], [`Notification`]   |
//! | **Client**        | Connection, call wrapper, signal pump.                   | [`KlipperClient`], [`Transport`]           |
//! | **Controllers**   | Clipboard and history operations.                        | [`ClipboardController`], [`HistoryManager`]|
//! | **Errors**        | Typed errors with stable labels.                         | [`ClientError`], [`TransportError`]        |
//! | **Configuration** | Service location, timeouts, relay conventions.           | [`ClientConfig`]                           |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use klipper_client::{ClientConfig, KlipperClient, MemoryTransport};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transport = Arc::new(MemoryTransport::with_content("hello"));
//!     let client = Arc::new(KlipperClient::new(ClientConfig::default(), transport));
//!
//!     client.connect().await?;
//!     assert_eq!(client.clipboard().get_text().await, "hello");
//!
//!     client.clipboard().set_text("world").await?;
//!     assert_eq!(client.history().get_recent_items(5).await?, ["world"]);
//!
//!     client.shutdown().await;
//!     Ok(())
//! }
//! ```
mod classifier;
mod client;
mod config;
mod controllers;
mod error;
mod relay;
mod transport;

// ---- Public re-exports ----

pub use classifier::{
    ClassificationOutcome, Classifier, Diagnostic, EntropyKind, Failure, Payload, Signal,
    CONTEXT_ENTROPY, CONTEXT_INGESTION, NOTE_REQUIRES_INTEGRATION,
};
pub use client::KlipperClient;
pub use config::ClientConfig;
pub use controllers::{ClipboardBackend, ClipboardController, HistoryManager};
pub use error::{ClientError, ObserverResult, RelayError, TransportError};
pub use relay::{
    Delivery, LogObserver, Notification, ObserverFn, ObserverId, Observe, Relay, Routing,
};
pub use transport::{ChangeSender, MemoryTransport, Method, Transport, CHANGE_SIGNAL};
