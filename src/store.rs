//! Key-value persistence backends for the save blob.
//!
//! - [`MemoryStore`]: shared in-memory map, used by tests and as a fallback.
//! - [`FileStore`]: one JSON file per key in a directory (native only).
//! - [`LocalStorageStore`]: browser `localStorage` (wasm only).

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::StoreError;

/// A string store addressed by key.
pub trait SaveStore {
    /// Read the blob under `key`. `Ok(None)` means nothing was saved.
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn write(&mut self, key: &str, blob: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// In-memory store. Clones share the same map, so a test can keep a handle
/// after giving one to a session.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
    offline: Rc<Cell<bool>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every operation fail with `PersistenceUnavailable`.
    pub fn set_offline(&self, offline: bool) {
        self.offline.set(offline);
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    pub fn insert(&self, key: &str, blob: &str) {
        self.entries.borrow_mut().insert(key.to_string(), blob.to_string());
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.get() {
            Err(StoreError::PersistenceUnavailable(
                "memory store is offline".into(),
            ))
        } else {
            Ok(())
        }
    }
}

impl SaveStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.check_online()?;
        Ok(self.get(key))
    }

    fn write(&mut self, key: &str, blob: &str) -> Result<(), StoreError> {
        self.check_online()?;
        self.insert(key, blob);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.check_online()?;
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use std::fs;
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};

    use super::SaveStore;
    use crate::error::StoreError;

    /// Stores each key as `<dir>/<key>.json`.
    pub struct FileStore {
        dir: PathBuf,
    }

    impl FileStore {
        pub fn new(dir: impl Into<PathBuf>) -> Self {
            Self { dir: dir.into() }
        }

        pub fn path_for(&self, key: &str) -> PathBuf {
            self.dir.join(format!("{}.json", key))
        }

        pub fn dir(&self) -> &Path {
            &self.dir
        }
    }

    impl SaveStore for FileStore {
        fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
            match fs::read_to_string(self.path_for(key)) {
                Ok(s) => Ok(Some(s)),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            }
        }

        fn write(&mut self, key: &str, blob: &str) -> Result<(), StoreError> {
            fs::create_dir_all(&self.dir)?;
            // Temp file + rename: readers never see a partial blob.
            let path = self.path_for(key);
            let tmp = path.with_extension("json.tmp");
            fs::write(&tmp, blob)?;
            fs::rename(&tmp, &path)?;
            Ok(())
        }

        fn remove(&mut self, key: &str) -> Result<(), StoreError> {
            match fs::remove_file(self.path_for(key)) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::LocalStorageStore;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::SaveStore;
    use crate::error::StoreError;

    /// Browser `localStorage`. Every call re-resolves the storage handle so a
    /// store that was unavailable at startup can recover later.
    #[derive(Default)]
    pub struct LocalStorageStore;

    impl LocalStorageStore {
        pub fn new() -> Self {
            Self
        }

        fn storage(&self) -> Result<web_sys::Storage, StoreError> {
            web_sys::window()
                .and_then(|w| w.local_storage().ok().flatten())
                .ok_or_else(|| {
                    StoreError::PersistenceUnavailable("localStorage is not available".into())
                })
        }
    }

    fn js_err(e: web_sys::wasm_bindgen::JsValue) -> StoreError {
        StoreError::PersistenceUnavailable(format!("{:?}", e))
    }

    impl SaveStore for LocalStorageStore {
        fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.storage()?.get_item(key).map_err(js_err)
        }

        fn write(&mut self, key: &str, blob: &str) -> Result<(), StoreError> {
            self.storage()?.set_item(key, blob).map_err(|e| {
                web_sys::console::warn_1(
                    &format!("TubeCoins: localStorage への保存に失敗: {e:?}").into(),
                );
                js_err(e)
            })
        }

        fn remove(&mut self, key: &str) -> Result<(), StoreError> {
            self.storage()?.remove_item(key).map_err(js_err)
        }
    }
}
