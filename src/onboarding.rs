use std::cell::RefCell;
use std::collections::HashMap;

/// Storage key for the first-visit flag.
pub const FLAG_KEY: &str = "isFirstTimeUser";
pub const FLAG_SHOW: &str = "true";
pub const FLAG_DISMISSED: &str = "false";

/// String key/value storage scoped to the browser profile.
pub trait FlagStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

/// Decides whether the welcome panel shows and records its dismissal.
pub struct Onboarding;

impl Onboarding {
    /// Read the flag on mount. Returns whether the panel should be visible.
    ///
    /// A first visit writes `"true"`; only an explicit `"false"` hides it.
    pub fn on_mount(store: &dyn FlagStore) -> bool {
        match store.get(FLAG_KEY) {
            None => {
                store.set(FLAG_KEY, FLAG_SHOW);
                true
            }
            Some(value) => value != FLAG_DISMISSED,
        }
    }

    pub fn dismiss(store: &dyn FlagStore) {
        store.set(FLAG_KEY, FLAG_DISMISSED);
    }
}

/// In-process store, used where no browser storage exists.
#[derive(Debug, Default)]
pub struct MemoryFlags {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryFlags {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FlagStore for MemoryFlags {
    fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }
}
