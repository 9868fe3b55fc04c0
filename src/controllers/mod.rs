//! High-level clipboard and history operations.
//!
//! Controllers depend on [`ClipboardBackend`], implemented by
//! [`KlipperClient`](crate::KlipperClient), so they can be exercised against a
//! fake backend.

mod clipboard;
mod history;

use async_trait::async_trait;

use crate::error::ClientError;

pub use clipboard::ClipboardController;
pub use history::HistoryManager;

/// Operations the controllers need from a client.
#[async_trait]
pub trait ClipboardBackend: Send + Sync + 'static {
    /// Current clipboard content.
    async fn get_clipboard_contents(&self) -> Result<String, ClientError>;

    /// Replaces the clipboard content.
    async fn set_clipboard_contents(&self, text: &str) -> Result<(), ClientError>;

    /// History, most recent first.
    async fn get_history(&self) -> Result<Vec<String>, ClientError>;

    /// Clears the service-side history.
    async fn clear_history(&self) -> Result<(), ClientError>;
}
