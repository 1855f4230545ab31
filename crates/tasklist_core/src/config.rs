//! Store configuration.

/// Storage key used by earlier releases of the app; keep it stable so
/// existing snapshots keep hydrating.
pub const DEFAULT_STORAGE_KEY: &str = "my-todo";

/// Explicit configuration passed to [`crate::TaskListStore::hydrate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Key holding the whole task list snapshot.
    pub storage_key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl StoreConfig {
    pub fn with_storage_key(storage_key: impl Into<String>) -> Self {
        Self {
            storage_key: storage_key.into(),
        }
    }
}
