//! # History controller.
//!
//! Slicing and filtering over the backend's history view. Nothing is cached;
//! every call re-reads the history.

use std::sync::Arc;

use super::ClipboardBackend;
use crate::error::ClientError;

/// Recent items, pages and search over clipboard history.
#[derive(Clone)]
pub struct HistoryManager {
    backend: Arc<dyn ClipboardBackend>,
    default_limit: Option<usize>,
}

impl HistoryManager {
    /// Wraps a backend. The default recent-items view is unlimited.
    pub fn new(backend: Arc<dyn ClipboardBackend>) -> Self {
        Self {
            backend,
            default_limit: None,
        }
    }

    /// Sets the size of [`recent`](Self::recent) (`None` = unlimited).
    #[must_use]
    pub fn with_default_limit(mut self, limit: Option<usize>) -> Self {
        self.default_limit = limit;
        self
    }

    /// The `limit` most recent items.
    pub async fn get_recent_items(&self, limit: usize) -> Result<Vec<String>, ClientError> {
        let mut items = self.backend.get_history().await?;
        items.truncate(limit);
        Ok(items)
    }

    /// Recent items using the configured default limit.
    pub async fn recent(&self) -> Result<Vec<String>, ClientError> {
        match self.default_limit {
            Some(limit) => self.get_recent_items(limit).await,
            None => self.backend.get_history().await,
        }
    }

    /// `limit` items starting at `offset`.
    pub async fn page(&self, offset: usize, limit: usize) -> Result<Vec<String>, ClientError> {
        let items = self.backend.get_history().await?;
        Ok(items.into_iter().skip(offset).take(limit).collect())
    }

    /// Items containing `query`, case-insensitively. An empty query matches everything.
    pub async fn search(&self, query: &str) -> Result<Vec<String>, ClientError> {
        let needle = query.to_lowercase();
        let items = self.backend.get_history().await?;
        Ok(items
            .into_iter()
            .filter(|item| item.to_lowercase().contains(&needle))
            .collect())
    }

    /// Clears the entire history.
    pub async fn clear_all(&self) -> Result<(), ClientError> {
        self.backend.clear_history().await
    }
}
