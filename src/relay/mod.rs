//! # Change relay.
//!
//! A minimal publish/subscribe fan-out. The client's signal pump emits one
//! notification per clipboard change; any number of observers react to it.
//!
//! ## Architecture
//! ```text
//! signal pump ── emit(content, Channel("clipboard_change"), 0.8) ──► Relay
//!                                                                     │
//!                                                   ┌─────────────────┼─────────────┐
//!                                                   ▼                 ▼             ▼
//!                                              LogObserver       ObserverFn      Custom
//! ```
//!
//! ## Contents
//! - [`Relay`] ordered, thread-guarded observer list and synchronous `emit`
//! - [`Observe`] observer trait, [`ObserverFn`] closure adapter, [`LogObserver`]
//! - [`Notification`], [`Routing`] message model
//! - [`Delivery`] per-emit report

mod fanout;
mod log;
mod notification;
mod observe;

pub use fanout::{Delivery, ObserverId, Relay};
pub use log::LogObserver;
pub use notification::{Notification, Routing};
pub use observe::{Observe, ObserverFn};

pub(crate) use notification::clamp_weight;
