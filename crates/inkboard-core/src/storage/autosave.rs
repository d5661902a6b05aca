//! Debounced persistence of the scene.
//!
//! Every scene change restarts the debounce window; a save happens once the
//! window closes without further changes. Nothing is saved until the
//! initial load has finished, so an empty startup scene never overwrites
//! what was stored.

use crate::config::EngineConfig;
use crate::elements::Element;
use crate::storage::{Storage, StorageResult};
use std::sync::Arc;

#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};

/// Debounces saves of the element list to a storage backend.
pub struct AutoSave<S: Storage> {
    storage: Arc<S>,
    debounce: Duration,
    /// Time of the newest unsaved change.
    pending_since: Option<Instant>,
    last_save: Option<Instant>,
    loaded: bool,
}

impl<S: Storage> AutoSave<S> {
    pub fn new(storage: Arc<S>, debounce: Duration) -> Self {
        Self {
            storage,
            debounce,
            pending_since: None,
            last_save: None,
            loaded: false,
        }
    }

    pub fn from_config(storage: Arc<S>, config: &EngineConfig) -> Self {
        Self::new(storage, config.autosave_debounce())
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn has_pending(&self) -> bool {
        self.pending_since.is_some()
    }

    pub fn last_save(&self) -> Option<Instant> {
        self.last_save
    }

    /// Load the stored scene. Saving is enabled only after this succeeds.
    pub async fn load(&mut self) -> StorageResult<Vec<Element>> {
        match self.storage.load().await {
            Ok(elements) => {
                log::info!("Loaded {} elements from storage", elements.len());
                self.loaded = true;
                Ok(elements)
            }
            Err(e) => {
                log::error!("Failed to load saved scene: {}", e);
                Err(e)
            }
        }
    }

    /// Record a scene change at `now`, restarting the debounce window.
    pub fn mark_changed(&mut self, now: Instant) {
        if !self.loaded {
            return;
        }
        self.pending_since = Some(now);
    }

    /// Whether the debounce window has closed on a pending change.
    pub fn should_save(&self, now: Instant) -> bool {
        self.loaded
            && self
                .pending_since
                .is_some_and(|changed| now.saturating_duration_since(changed) >= self.debounce)
    }

    /// Save immediately.
    pub async fn save(&mut self, elements: &[Element], now: Instant) -> StorageResult<()> {
        if let Err(e) = self.storage.save(elements).await {
            log::error!("Failed to save scene: {}", e);
            return Err(e);
        }
        self.pending_since = None;
        self.last_save = Some(now);
        Ok(())
    }

    /// Save if the debounce window has closed. Returns true if saved.
    pub async fn maybe_save(&mut self, elements: &[Element], now: Instant) -> StorageResult<bool> {
        if !self.should_save(now) {
            return Ok(false);
        }
        self.save(elements, now).await?;
        Ok(true)
    }

    /// Get a reference to the storage backend.
    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }
}

/// Create a platform-appropriate storage backend.
#[cfg(not(target_arch = "wasm32"))]
pub fn create_default_storage() -> StorageResult<Arc<crate::storage::FileStorage>> {
    Ok(Arc::new(crate::storage::FileStorage::default_location()?))
}

#[cfg(target_arch = "wasm32")]
pub fn create_default_storage() -> StorageResult<Arc<crate::storage::LocalStorage>> {
    Ok(Arc::new(crate::storage::LocalStorage::new()))
}

/// Convenience type alias for platform-specific storage.
#[cfg(not(target_arch = "wasm32"))]
pub type PlatformStorage = crate::storage::FileStorage;

#[cfg(target_arch = "wasm32")]
pub type PlatformStorage = crate::storage::LocalStorage;

/// Auto-save over the platform storage.
pub type PlatformAutoSave = AutoSave<PlatformStorage>;

/// Auto-save over the default storage with the configured debounce.
pub fn create_autosave(config: &EngineConfig) -> StorageResult<PlatformAutoSave> {
    let storage = create_default_storage()?;
    Ok(AutoSave::from_config(storage, config))
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::elements::{BoxSize, DEFAULT_STROKE, ElementKind};
    use crate::storage::{MemoryStorage, block_on};

    fn manager() -> AutoSave<MemoryStorage> {
        AutoSave::new(Arc::new(MemoryStorage::new()), Duration::from_millis(2000))
    }

    fn rect() -> Element {
        Element::new(ElementKind::Rectangle(BoxSize::new(5.0, 5.0)), 0.0, 0.0, DEFAULT_STROKE)
    }

    #[test]
    fn test_changes_before_load_are_ignored() {
        let mut autosave = manager();
        let start = Instant::now();
        autosave.mark_changed(start);
        assert!(!autosave.has_pending());
        assert!(!autosave.should_save(start + Duration::from_secs(10)));
    }

    #[test]
    fn test_debounce_restarts_on_each_change() {
        let mut autosave = manager();
        block_on(autosave.load()).unwrap();
        let start = Instant::now();

        autosave.mark_changed(start);
        assert!(!autosave.should_save(start + Duration::from_millis(1500)));

        autosave.mark_changed(start + Duration::from_millis(1500));
        assert!(!autosave.should_save(start + Duration::from_millis(3000)));
        assert!(autosave.should_save(start + Duration::from_millis(3500)));
    }

    #[test]
    fn test_maybe_save_writes_once() {
        let mut autosave = manager();
        block_on(autosave.load()).unwrap();
        let start = Instant::now();
        let elements = vec![rect()];

        autosave.mark_changed(start);
        assert!(!block_on(autosave.maybe_save(&elements, start)).unwrap());

        let later = start + Duration::from_secs(2);
        assert!(block_on(autosave.maybe_save(&elements, later)).unwrap());
        assert!(!autosave.has_pending());
        assert_eq!(autosave.last_save(), Some(later));
        assert!(!block_on(autosave.maybe_save(&elements, later)).unwrap());

        let stored = block_on(autosave.storage().load()).unwrap();
        assert_eq!(stored, elements);
    }

    #[test]
    fn test_reload_returns_saved_scene() {
        let storage = Arc::new(MemoryStorage::new());
        let elements = vec![rect()];
        block_on(storage.save(&elements)).unwrap();

        let mut autosave = AutoSave::from_config(storage, &EngineConfig::default());
        assert_eq!(autosave.debounce(), Duration::from_millis(2000));
        assert_eq!(block_on(autosave.load()).unwrap(), elements);
        assert!(autosave.is_loaded());
    }
}
