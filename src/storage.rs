use std::collections::HashMap;
use std::path::PathBuf;

/// String-keyed durable storage, the only shared mutable resource in the
/// crate. Values are whole strings (the replica and cache store JSON blobs);
/// writes either land or are logged and dropped — persistence is never fatal.
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

/// In-memory storage for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }
}

/// File-backed storage: one file per key under a data directory.
#[derive(Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Default location under the platform data directory.
    pub fn default_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join("tabsync")
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl Default for FileStorage {
    fn default() -> Self {
        Self::new(Self::default_dir())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Err(e) = std::fs::create_dir_all(&self.dir) {
            log::warn!("Failed to create storage dir {:?}: {}", self.dir, e);
            return;
        }
        if let Err(e) = std::fs::write(self.path_for(key), value) {
            log::warn!("Failed to write storage key {}: {}", key, e);
        }
    }

    fn remove(&mut self, key: &str) {
        let path = self.path_for(key);
        if path.exists() {
            if let Err(e) = std::fs::remove_file(&path) {
                log::warn!("Failed to remove storage key {}: {}", key, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_roundtrip() {
        let mut store = MemoryStorage::new();
        assert_eq!(store.get("k"), None);
        store.set("k", "v");
        assert_eq!(store.get("k"), Some("v".to_string()));
        store.remove("k");
        assert_eq!(store.get("k"), None);
    }

    #[test]
    fn file_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = FileStorage::new(tmp.path().join("store"));
        assert_eq!(store.get("token"), None);
        store.set("token", "*");
        assert_eq!(store.get("token"), Some("*".to_string()));
        store.set("token", "abc123");
        assert_eq!(store.get("token"), Some("abc123".to_string()));
        store.remove("token");
        assert_eq!(store.get("token"), None);
        // Removing a missing key is fine
        store.remove("token");
    }
}
