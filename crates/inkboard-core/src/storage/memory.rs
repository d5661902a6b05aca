//! In-memory storage implementation.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use crate::elements::Element;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral use.
#[derive(Default)]
pub struct MemoryStorage {
    elements: RwLock<Option<Vec<Element>>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether anything was saved.
    pub fn has_saved(&self) -> bool {
        self.elements.read().map(|saved| saved.is_some()).unwrap_or(false)
    }
}

impl Storage for MemoryStorage {
    fn load(&self) -> BoxFuture<'_, StorageResult<Vec<Element>>> {
        Box::pin(async move {
            let saved = self
                .elements
                .read()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            Ok(saved.clone().unwrap_or_default())
        })
    }

    fn save(&self, elements: &[Element]) -> BoxFuture<'_, StorageResult<()>> {
        let elements = elements.to_vec();
        Box::pin(async move {
            let mut saved = self
                .elements
                .write()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            *saved = Some(elements);
            Ok(())
        })
    }

    fn clear(&self) -> BoxFuture<'_, StorageResult<()>> {
        Box::pin(async move {
            let mut saved = self
                .elements
                .write()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            *saved = None;
            Ok(())
        })
    }
}
