//! Usage: Durable key-value storage for the session token.

use crate::shared::mutex_ext::MutexExt;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub const DEFAULT_SESSION_TOKEN_KEY: &str = "sessionToken";

pub trait TokenStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, String>;
    fn set(&self, key: &str, value: &str) -> Result<(), String>;
    fn remove(&self, key: &str) -> Result<(), String>;
}

#[derive(Debug, Default)]
pub struct MemoryTokenStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryTokenStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn get(&self, key: &str) -> Result<Option<String>, String> {
        Ok(self.entries.lock_or_recover().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        self.entries
            .lock_or_recover()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), String> {
        self.entries.lock_or_recover().remove(key);
        Ok(())
    }
}

/// A JSON object file of string values. Writes go through a temp file and a
/// rename so a crash never leaves a truncated file behind.
#[derive(Debug)]
pub struct FileTokenStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileTokenStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Map<String, Value>, String> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(format!("failed to read {}: {e}", self.path.display())),
        };
        if text.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(format!("{} is not a JSON object", self.path.display())),
            Err(e) => Err(format!("failed to parse {}: {e}", self.path.display())),
        }
    }

    fn write_all(&self, entries: &Map<String, Value>) -> Result<(), String> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)
                    .map_err(|e| format!("failed to create {}: {e}", dir.display()))?;
            }
        }
        let bytes = serde_json::to_vec_pretty(entries)
            .map_err(|e| format!("failed to serialize token storage: {e}"))?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, bytes).map_err(|e| format!("failed to write {}: {e}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .map_err(|e| format!("failed to replace {}: {e}", self.path.display()))
    }

    fn update(&self, f: impl FnOnce(&mut Map<String, Value>) -> bool) -> Result<(), String> {
        let _guard = self.write_lock.lock_or_recover();
        let mut entries = self.read_all()?;
        if f(&mut entries) {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

impl TokenStorage for FileTokenStorage {
    fn get(&self, key: &str) -> Result<Option<String>, String> {
        Ok(self
            .read_all()?
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        self.update(|entries| {
            entries.insert(key.to_string(), Value::String(value.to_string()));
            true
        })
    }

    fn remove(&self, key: &str) -> Result<(), String> {
        self.update(|entries| entries.remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_round_trip() {
        let storage = MemoryTokenStorage::new();
        storage.set(DEFAULT_SESSION_TOKEN_KEY, "tok").unwrap();
        assert_eq!(storage.get(DEFAULT_SESSION_TOKEN_KEY).unwrap().as_deref(), Some("tok"));
        storage.remove(DEFAULT_SESSION_TOKEN_KEY).unwrap();
        assert_eq!(storage.get(DEFAULT_SESSION_TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn file_storage_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("session.json");

        FileTokenStorage::new(&path).set(DEFAULT_SESSION_TOKEN_KEY, "tok-1").unwrap();
        FileTokenStorage::new(&path).set("theme", "dark").unwrap();

        let reopened = FileTokenStorage::new(&path);
        assert_eq!(reopened.get(DEFAULT_SESSION_TOKEN_KEY).unwrap().as_deref(), Some("tok-1"));
        assert_eq!(reopened.get("theme").unwrap().as_deref(), Some("dark"));

        reopened.remove(DEFAULT_SESSION_TOKEN_KEY).unwrap();
        assert_eq!(FileTokenStorage::new(&path).get(DEFAULT_SESSION_TOKEN_KEY).unwrap(), None);
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn file_storage_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileTokenStorage::new(dir.path().join("absent.json"));
        assert_eq!(storage.get(DEFAULT_SESSION_TOKEN_KEY).unwrap(), None);
        storage.remove(DEFAULT_SESSION_TOKEN_KEY).unwrap();
        assert!(!storage.path().exists());
    }

    #[test]
    fn file_storage_reports_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "[1, 2]").unwrap();
        assert!(FileTokenStorage::new(&path).get(DEFAULT_SESSION_TOKEN_KEY).is_err());
    }
}
