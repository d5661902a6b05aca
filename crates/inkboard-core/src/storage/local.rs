//! Browser localStorage backend.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use crate::elements::Element;

/// Key under which the scene is stored.
pub const DEFAULT_KEY: &str = "inkboard.scene";

/// Stores the scene as a JSON string in `window.localStorage`.
pub struct LocalStorage {
    key: String,
}

impl LocalStorage {
    pub fn new() -> Self {
        Self::with_key(DEFAULT_KEY)
    }

    pub fn with_key(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn backend() -> StorageResult<web_sys::Storage> {
        let window = web_sys::window().ok_or_else(|| StorageError::Other("No window".to_string()))?;
        window
            .local_storage()
            .map_err(|e| StorageError::Other(format!("localStorage unavailable: {:?}", e)))?
            .ok_or_else(|| StorageError::Other("localStorage unavailable".to_string()))
    }
}

impl Default for LocalStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for LocalStorage {
    fn load(&self) -> BoxFuture<'_, StorageResult<Vec<Element>>> {
        Box::pin(async move {
            let stored = Self::backend()?
                .get_item(&self.key)
                .map_err(|e| StorageError::Io(format!("{:?}", e)))?;
            match stored {
                Some(json) => {
                    serde_json::from_str(&json).map_err(|e| StorageError::Serialization(e.to_string()))
                }
                None => Ok(Vec::new()),
            }
        })
    }

    fn save(&self, elements: &[Element]) -> BoxFuture<'_, StorageResult<()>> {
        let json = serde_json::to_string(elements);
        Box::pin(async move {
            let json = json.map_err(|e| StorageError::Serialization(e.to_string()))?;
            Self::backend()?
                .set_item(&self.key, &json)
                .map_err(|e| StorageError::Io(format!("{:?}", e)))
        })
    }

    fn clear(&self) -> BoxFuture<'_, StorageResult<()>> {
        Box::pin(async move {
            Self::backend()?
                .remove_item(&self.key)
                .map_err(|e| StorageError::Io(format!("{:?}", e)))
        })
    }
}
