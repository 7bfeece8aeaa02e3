use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Bearer credential text.
pub const TOKEN_KEY: &str = "token";
/// JSON array of catalog record snapshots.
pub const FAVORITES_KEY: &str = "favorites";
/// `light` or `dark`.
pub const THEME_KEY: &str = "theme";

/// Device-scoped key/value persistence.
///
/// Values are opaque text. Writes are durable by the time `set`/`remove`
/// return. Implementations are shared behind `Arc` by every component that
/// reads local state, so methods take `&self`.
pub trait LocalStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
    fn keys(&self) -> Vec<String>;
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct StoreData {
    #[serde(flatten)]
    data: BTreeMap<String, String>,
}

/// TOML-file backed store.
///
/// Every read goes back to the file so a second process writing the same
/// store is observed; the mutex serializes read-modify-write within this one.
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    pub fn open(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create store directory {}", parent.display()))?;
        }
        let entries = read_entries(&path).unwrap_or_default();
        debug!("Opened local store at {} ({} keys)", path.display(), entries.len());
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn refresh(&self, entries: &mut BTreeMap<String, String>) {
        if let Some(latest) = read_entries(&self.path) {
            *entries = latest;
        }
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let content = toml::to_string_pretty(&StoreData { data: entries.clone() })?;
        // Atomic write: temp file then rename
        let temp_path = self.path.with_extension("tmp");
        std::fs::write(&temp_path, content)
            .with_context(|| format!("Failed to write {}", temp_path.display()))?;
        std::fs::rename(&temp_path, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;
        Ok(())
    }
}

impl LocalStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let mut entries = self.lock();
        self.refresh(&mut entries);
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: String) -> Result<()> {
        let mut entries = self.lock();
        self.refresh(&mut entries);
        entries.insert(key.to_string(), value);
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.lock();
        self.refresh(&mut entries);
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        let mut entries = self.lock();
        self.refresh(&mut entries);
        entries.keys().cloned().collect()
    }
}

/// Reads the store file. A missing file is an empty store; `None` means it
/// could not be read. A corrupt file is moved aside to `*.bak` and reads as
/// empty so the next write starts clean.
fn read_entries(path: &Path) -> Option<BTreeMap<String, String>> {
    if !path.exists() {
        return Some(BTreeMap::new());
    }
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!("Failed to read local store {}: {}", path.display(), e);
            return None;
        }
    };
    match toml::from_str::<StoreData>(&content) {
        Ok(data) => Some(data.data),
        Err(e) => {
            let backup_path = path.with_extension("toml.bak");
            match std::fs::rename(path, &backup_path) {
                Ok(()) => warn!(
                    "Local store {} is corrupt ({}). Moved it to {} and starting empty.",
                    path.display(),
                    e,
                    backup_path.display()
                ),
                Err(mv_err) => warn!(
                    "Local store {} is corrupt ({}) and could not be moved aside: {}",
                    path.display(),
                    e,
                    mv_err
                ),
            }
            Some(BTreeMap::new())
        }
    }
}

/// Process-local store for tests and `--ephemeral` sessions.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: Mutex::new(entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl LocalStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: String) -> Result<()> {
        self.lock().insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock().remove(key);
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.lock().keys().cloned().collect();
        keys.sort();
        keys
    }
}
