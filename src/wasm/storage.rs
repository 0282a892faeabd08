use web_sys::{Storage, Window};

use crate::onboarding::FlagStore;

/// `window.localStorage`. Reads and writes become no-ops when storage is
/// unavailable (disabled cookies, sandboxed frames).
pub struct LocalStorageFlags {
    storage: Option<Storage>,
}

impl LocalStorageFlags {
    pub fn new(window: &Window) -> Self {
        Self {
            storage: window.local_storage().ok().flatten(),
        }
    }
}

impl FlagStore for LocalStorageFlags {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = &self.storage {
            if let Err(err) = storage.set_item(key, value) {
                log::warn!("localStorage.setItem({key}) failed: {err:?}");
            }
        }
    }
}
