//! # Current-clipboard controller.

use std::sync::Arc;

use tracing::debug;

use super::ClipboardBackend;
use crate::error::ClientError;

/// Get, set and clear the current clipboard.
#[derive(Clone)]
pub struct ClipboardController {
    backend: Arc<dyn ClipboardBackend>,
}

impl ClipboardController {
    /// Wraps a backend.
    pub fn new(backend: Arc<dyn ClipboardBackend>) -> Self {
        Self { backend }
    }

    /// Current clipboard text; any failure reads as `""`.
    pub async fn get_text(&self) -> String {
        match self.backend.get_clipboard_contents().await {
            Ok(text) => text,
            Err(err) => {
                debug!(label = err.as_label(), "clipboard read failed; returning empty text");
                String::new()
            }
        }
    }

    /// Replaces the clipboard text.
    pub async fn set_text(&self, text: &str) -> Result<(), ClientError> {
        self.backend.set_clipboard_contents(text).await
    }

    /// Empties the current clipboard. Whether history is kept depends on the
    /// service's own settings.
    pub async fn clear(&self) -> Result<(), ClientError> {
        self.backend.set_clipboard_contents("").await
    }
}
