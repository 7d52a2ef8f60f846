//! Browser-backed preference storage.

use crumbs_core::PreferenceStore;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("localStorage is unavailable: {0}")]
    Unavailable(String),
    #[error("localStorage rejected '{key}': {message}")]
    Rejected { key: String, message: String },
}

/// [`PreferenceStore`] on `window.localStorage`.
///
/// Outside the browser (server-side rendering, native tests) values live in a
/// per-thread map so the same code paths can run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BrowserPreferences;

#[cfg(not(target_arch = "wasm32"))]
thread_local! {
    static NATIVE: crumbs_core::MemoryPreferences = crumbs_core::MemoryPreferences::new();
}

impl PreferenceStore for BrowserPreferences {
    type Error = StorageError;

    #[cfg(target_arch = "wasm32")]
    fn read(&self, key: &str) -> Result<Option<String>, Self::Error> {
        let storage = crate::dom::local_storage()
            .map_err(|err| StorageError::Unavailable(crate::dom::js_error_message(&err)))?;
        storage.get_item(key).map_err(|err| StorageError::Rejected {
            key: key.to_string(),
            message: crate::dom::js_error_message(&err),
        })
    }

    #[cfg(target_arch = "wasm32")]
    fn write(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        let storage = crate::dom::local_storage()
            .map_err(|err| StorageError::Unavailable(crate::dom::js_error_message(&err)))?;
        storage.set_item(key, value).map_err(|err| StorageError::Rejected {
            key: key.to_string(),
            message: crate::dom::js_error_message(&err),
        })
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn read(&self, key: &str) -> Result<Option<String>, Self::Error> {
        NATIVE.with(|prefs| prefs.read(key)).map_err(|never| match never {})
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn write(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        NATIVE
            .with(|prefs| prefs.write(key, value))
            .map_err(|never| match never {})
    }
}
