//! File-based storage implementation for native platforms.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use crate::document::{FILE_EXTENSION, export_elements, import_elements};
use crate::elements::Element;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the scene file inside the storage directory.
const SCENE_FILE_STEM: &str = "scene";

/// Stores the scene as a portable document in a directory.
pub struct FileStorage {
    /// Base directory for the scene file.
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a new file storage with the given base directory.
    ///
    /// Creates the directory if it doesn't exist.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create storage directory: {}", e))
            })?;
        }
        Ok(Self { base_path })
    }

    /// Create file storage in the default location.
    ///
    /// On Linux: `~/.local/share/inkboard/`
    /// On Windows: `%LOCALAPPDATA%\inkboard\`
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;
        Self::new(base.join("inkboard"))
    }

    /// Path of the scene file.
    pub fn scene_path(&self) -> PathBuf {
        self.base_path.join(format!("{SCENE_FILE_STEM}.{FILE_EXTENSION}"))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl Storage for FileStorage {
    fn load(&self) -> BoxFuture<'_, StorageResult<Vec<Element>>> {
        let path = self.scene_path();
        Box::pin(async move {
            if !path.exists() {
                return Ok(Vec::new());
            }
            let json = fs::read_to_string(&path).map_err(|e| {
                StorageError::Io(format!("Failed to read {}: {}", path.display(), e))
            })?;
            import_elements(&json).map_err(|e| {
                StorageError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
            })
        })
    }

    fn save(&self, elements: &[Element]) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.scene_path();
        let json = match export_elements(elements) {
            Ok(json) => json,
            Err(e) => return Box::pin(async move { Err(StorageError::Serialization(e.to_string())) }),
        };
        Box::pin(async move {
            fs::write(&path, json).map_err(|e| {
                StorageError::Io(format!("Failed to write {}: {}", path.display(), e))
            })
        })
    }

    fn clear(&self) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.scene_path();
        Box::pin(async move {
            if path.exists() {
                fs::remove_file(&path).map_err(|e| {
                    StorageError::Io(format!("Failed to delete {}: {}", path.display(), e))
                })?;
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{BoxSize, DEFAULT_STROKE, ElementKind, TextBlock};
    use crate::storage::block_on;
    use tempfile::tempdir;

    #[test]
    fn test_file_storage_save_load() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        let text = Element::new(
            ElementKind::Text(TextBlock {
                text: "hello".into(),
                font_size: 24.0,
                size: BoxSize::new(75.0, 30.0),
            }),
            10.0,
            20.0,
            DEFAULT_STROKE,
        );

        block_on(storage.save(std::slice::from_ref(&text))).unwrap();
        assert!(storage.scene_path().exists());
        assert_eq!(block_on(storage.load()).unwrap(), vec![text]);
    }

    #[test]
    fn test_file_storage_missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested")).unwrap();
        assert!(storage.base_path().exists());
        assert!(block_on(storage.load()).unwrap().is_empty());
    }

    #[test]
    fn test_file_storage_corrupt_file() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        fs::write(storage.scene_path(), "{not json").unwrap();
        assert!(matches!(block_on(storage.load()), Err(StorageError::Serialization(_))));
    }

    #[test]
    fn test_file_storage_clear() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        block_on(storage.save(&[])).unwrap();
        block_on(storage.clear()).unwrap();
        assert!(!storage.scene_path().exists());
        block_on(storage.clear()).unwrap();
    }
}
