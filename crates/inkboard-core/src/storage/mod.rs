//! Persistence of the local scene between sessions.
//!
//! The core never saves on its own. Hosts load once at startup, then feed
//! scene changes through [`AutoSave`] and write when the debounce window
//! closes.

mod autosave;
mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

#[cfg(target_arch = "wasm32")]
mod local;

pub use autosave::{AutoSave, PlatformAutoSave, PlatformStorage, create_autosave, create_default_storage};
pub use memory::MemoryStorage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

#[cfg(target_arch = "wasm32")]
pub use local::LocalStorage;

use crate::elements::Element;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async operations (compatible with WASM).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Where the last-saved scene lives.
///
/// On native platforms implementations must be Send + Sync. On WASM these
/// bounds are relaxed since it's single-threaded.
#[cfg(not(target_arch = "wasm32"))]
pub trait Storage: Send + Sync {
    /// Last-saved elements, or an empty list when nothing was saved yet.
    fn load(&self) -> BoxFuture<'_, StorageResult<Vec<Element>>>;

    /// Replace the saved elements.
    fn save(&self, elements: &[Element]) -> BoxFuture<'_, StorageResult<()>>;

    /// Forget the saved elements.
    fn clear(&self) -> BoxFuture<'_, StorageResult<()>>;
}

/// Where the last-saved scene lives (WASM version without Send + Sync).
#[cfg(target_arch = "wasm32")]
pub trait Storage {
    /// Last-saved elements, or an empty list when nothing was saved yet.
    fn load(&self) -> BoxFuture<'_, StorageResult<Vec<Element>>>;

    /// Replace the saved elements.
    fn save(&self, elements: &[Element]) -> BoxFuture<'_, StorageResult<()>>;

    /// Forget the saved elements.
    fn clear(&self) -> BoxFuture<'_, StorageResult<()>>;
}

/// Drive a future to completion on the current thread. Test helper for the
/// backends, none of which actually suspend.
#[cfg(test)]
pub(crate) fn block_on<F: Future>(f: F) -> F::Output {
    use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

    fn dummy_raw_waker() -> RawWaker {
        fn no_op(_: *const ()) {}
        fn clone(_: *const ()) -> RawWaker {
            dummy_raw_waker()
        }
        static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
        RawWaker::new(std::ptr::null(), &VTABLE)
    }

    let waker = unsafe { Waker::from_raw(dummy_raw_waker()) };
    let mut cx = Context::from_waker(&waker);
    let mut f = std::pin::pin!(f);

    loop {
        match f.as_mut().poll(&mut cx) {
            Poll::Ready(result) => return result,
            Poll::Pending => {}
        }
    }
}
