//! Error types used by the client, the transport seam and the relay.
//!
//! This module defines three error enums:
//!
//! - [`ClientError`] — errors surfaced to callers of [`KlipperClient`](crate::KlipperClient).
//! - [`TransportError`] — errors produced by a [`Transport`](crate::Transport) implementation.
//! - [`RelayError`] — per-observer delivery faults, reported but never propagated by `emit`.
//!
//! All of them provide helper methods (`as_label`, `as_message`) for logs, and
//! [`ClientError::is_retryable`] for callers that want to retry.

use std::error::Error as StdError;
use std::time::Duration;

use thiserror::Error;

/// Result type returned by relay observers.
pub type ObserverResult = Result<(), Box<dyn StdError + Send + Sync>>;

/// # Errors surfaced by the client.
///
/// Every one of these passes through the classifier before it reaches the
/// caller; the caller receives it unchanged.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ClientError {
    /// A call was attempted without a transport (offline client).
    #[error("not connected to klipper")]
    NotConnected,

    /// The transport refused to connect.
    #[error("could not connect to klipper service: {source}")]
    Connect {
        /// The transport failure.
        #[source]
        source: TransportError,
    },

    /// The remote call returned a failure.
    #[error("call {method} failed: {source}")]
    Transport {
        /// Remote method name.
        method: &'static str,
        /// The transport failure.
        #[source]
        source: TransportError,
    },

    /// The remote call did not complete within the configured timeout.
    #[error("call {method} timed out after {timeout:?}")]
    Timeout {
        /// Remote method name.
        method: &'static str,
        /// The timeout that was exceeded.
        timeout: Duration,
    },

    /// The blocking worker running the call panicked or was cancelled.
    #[error("worker for {method} did not complete: {error}")]
    Worker {
        /// Remote method name.
        method: &'static str,
        /// Join failure description.
        error: String,
    },
}

impl ClientError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use klipper_client::ClientError;
    ///
    /// assert_eq!(ClientError::NotConnected.as_label(), "client_not_connected");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ClientError::NotConnected => "client_not_connected",
            ClientError::Connect { .. } => "client_connect_failed",
            ClientError::Transport { .. } => "client_transport_failed",
            ClientError::Timeout { .. } => "client_timeout",
            ClientError::Worker { .. } => "client_worker_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ClientError::NotConnected => "not connected".to_string(),
            ClientError::Connect { source } => format!("connect: {}", source.as_message()),
            ClientError::Transport { method, source } => {
                format!("{method}: {}", source.as_message())
            }
            ClientError::Timeout { method, timeout } => format!("{method}: timeout {timeout:?}"),
            ClientError::Worker { method, error } => format!("{method}: worker {error}"),
        }
    }

    /// Indicates whether repeating the same call may succeed.
    ///
    /// Returns `true` for [`ClientError::Transport`] and [`ClientError::Timeout`].
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    /// use klipper_client::ClientError;
    ///
    /// let err = ClientError::Timeout { method: "getClipboardContents", timeout: Duration::from_secs(1) };
    /// assert!(err.is_retryable());
    /// assert!(!ClientError::NotConnected.is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ClientError::Transport { .. } | ClientError::Timeout { .. }
        )
    }
}

/// # Errors produced by a transport.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The service cannot be reached.
    #[error("service unavailable: {reason}")]
    Unavailable {
        /// Why the service is unreachable.
        reason: String,
    },

    /// The service does not expose the requested member.
    #[error("unknown method {method}")]
    UnknownMethod {
        /// Remote method name.
        method: String,
    },

    /// Arguments did not match the method signature.
    #[error("invalid arguments for {method}: {reason}")]
    InvalidArgs {
        /// Remote method name.
        method: String,
        /// What was wrong with the arguments.
        reason: String,
    },

    /// The service replied with an error.
    #[error("{name}: {message}")]
    Remote {
        /// Remote error name.
        name: String,
        /// Remote error message.
        message: String,
    },
}

impl TransportError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            TransportError::Unavailable { .. } => "transport_unavailable",
            TransportError::UnknownMethod { .. } => "transport_unknown_method",
            TransportError::InvalidArgs { .. } => "transport_invalid_args",
            TransportError::Remote { .. } => "transport_remote",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            TransportError::Unavailable { reason } => format!("unavailable: {reason}"),
            TransportError::UnknownMethod { method } => format!("unknown method: {method}"),
            TransportError::InvalidArgs { method, reason } => {
                format!("invalid args for {method}: {reason}")
            }
            TransportError::Remote { name, message } => format!("remote {name}: {message}"),
        }
    }
}

/// # Per-observer delivery faults.
///
/// Produced by [`Relay::deliver`](crate::Relay::deliver); collected in the
/// [`Delivery`](crate::Delivery) report and logged, never raised to the emitter.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RelayError {
    /// Observer returned an error.
    #[error("observer {observer} failed: {error}")]
    ObserverFailed {
        /// Observer name.
        observer: &'static str,
        /// Error description.
        error: String,
    },

    /// Observer panicked.
    #[error("observer {observer} panicked: {info}")]
    ObserverPanicked {
        /// Observer name.
        observer: &'static str,
        /// Panic payload, if it was a string.
        info: String,
    },
}

impl RelayError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            RelayError::ObserverFailed { .. } => "relay_observer_failed",
            RelayError::ObserverPanicked { .. } => "relay_observer_panicked",
        }
    }

    /// Name of the observer that faulted.
    pub fn observer(&self) -> &'static str {
        match self {
            RelayError::ObserverFailed { observer, .. }
            | RelayError::ObserverPanicked { observer, .. } => observer,
        }
    }
}

/// Extracts a readable message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
