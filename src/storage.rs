// Local JSON document storage standing in for the hosted backend.
//
// ⚠️ VERSION BUMP REQUIRED:
// Breaking changes to the serialized shape of Event/Artist/Artwork/Conversation
// require incrementing STORAGE_VERSION below.
use anyhow::{Context, Result};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock, PoisonError};

pub const EVENTS_FILENAME: &str = "events.json";
pub const ARTISTS_FILENAME: &str = "artists.json";
pub const ARTWORKS_FILENAME: &str = "artworks.json";
pub const USERS_FILENAME: &str = "users.json";
pub const CHATS_FILENAME: &str = "chats.json";

// Version history:
// - v0: bare JSON array (hand-written seed files)
// - v1: versioned envelope
const STORAGE_VERSION: u32 = 1;

/// Versioned envelope around every document.
#[derive(Deserialize)]
struct Document<T> {
    #[serde(default)]
    version: u32,
    items: Vec<T>,
}

#[derive(Serialize)]
struct DocumentRef<'a, T> {
    version: u32,
    items: &'a [T],
}

/// Tracks whether the last load of each document succeeded.
/// Saves are refused over a document that could not be read, so a parse error
/// never turns into silent data loss.
static LOAD_STATE_MAP: OnceLock<Mutex<HashMap<PathBuf, LoadState>>> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadState {
    Uninitialized,
    Success,
    Failed,
}

impl LoadState {
    fn get(path: &Path) -> LoadState {
        let map = LOAD_STATE_MAP.get_or_init(|| Mutex::new(HashMap::new()));
        *map.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .unwrap_or(&LoadState::Uninitialized)
    }

    fn set(path: &Path, state: LoadState) {
        let map = LOAD_STATE_MAP.get_or_init(|| Mutex::new(HashMap::new()));
        map.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.to_path_buf(), state);
    }
}

pub struct LocalStorage;

impl LocalStorage {
    fn get_lock_path(file_path: &Path) -> PathBuf {
        file_path.with_extension("lock")
    }

    /// Runs `f` while holding an exclusive lock on a sidecar `.lock` file.
    pub fn with_lock<F, T>(file_path: &Path, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let lock_path = Self::get_lock_path(file_path);
        let file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("Failed to open lock file {:?}", lock_path))?;

        file.lock_exclusive()?;
        let result = f();
        file.unlock()?;
        result
    }

    /// Atomic write: Write to .tmp file then rename
    pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<()> {
        let path = path.as_ref();
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, contents)?;
        fs::rename(tmp_path, path)?;
        Ok(())
    }

    fn parse_document<T: DeserializeOwned>(json: &str) -> Result<Vec<T>> {
        if let Ok(doc) = serde_json::from_str::<Document<T>>(json) {
            if doc.version > STORAGE_VERSION {
                anyhow::bail!(
                    "document version {} is newer than supported version {}",
                    doc.version,
                    STORAGE_VERSION
                );
            }
            return Ok(doc.items);
        }
        // v0: a bare array
        Ok(serde_json::from_str::<Vec<T>>(json)?)
    }

    /// Reads a document without taking the lock. Callers hold it.
    fn read_unlocked<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
        if !path.exists() {
            return Ok(vec![]);
        }
        let json = fs::read_to_string(path)?;
        Self::parse_document(&json)
    }

    fn write_unlocked<T: Serialize>(path: &Path, items: &[T]) -> Result<()> {
        let doc = DocumentRef {
            version: STORAGE_VERSION,
            items,
        };
        let json = serde_json::to_string_pretty(&doc)?;
        Self::atomic_write(path, json)
    }

    fn record_load<T>(path: &Path, result: Result<T>) -> Result<T> {
        let result = result.with_context(|| format!("Failed to load {}", path.display()));
        match &result {
            Ok(_) => LoadState::set(path, LoadState::Success),
            Err(e) => {
                log::error!("{:#}", e);
                LoadState::set(path, LoadState::Failed);
            }
        }
        result
    }

    /// Loads every item of a document. A missing file is an empty document.
    pub fn load_document<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
        if !path.exists() {
            LoadState::set(path, LoadState::Success);
            return Ok(vec![]);
        }
        let result = Self::with_lock(path, || Self::read_unlocked(path));
        Self::record_load(path, result)
    }

    /// Writes `items` as the current document version.
    pub fn save_document<T: Serialize>(path: &Path, items: &[T]) -> Result<()> {
        if LoadState::get(path) == LoadState::Failed {
            anyhow::bail!(
                "Refusing to overwrite {} because it could not be loaded",
                path.display()
            );
        }
        Self::with_lock(path, || Self::write_unlocked(path, items))?;
        LoadState::set(path, LoadState::Success);
        Ok(())
    }

    /// Loads a document, lets `f` edit it, and saves it back, all under one
    /// lock so concurrent updates never lose each other's items.
    pub fn update_document<T, F, R>(path: &Path, f: F) -> Result<R>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut Vec<T>) -> R,
    {
        let out = Self::with_lock(path, || {
            let mut items = Self::record_load(path, Self::read_unlocked::<T>(path))?;
            let out = f(&mut items);
            Self::write_unlocked(path, &items)?;
            Ok(out)
        })?;
        LoadState::set(path, LoadState::Success);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{AppContext, TestContext};
    use crate::model::RawEvent;

    #[test]
    fn missing_document_is_empty() {
        let ctx = TestContext::new();
        let path = ctx.get_events_path().unwrap();
        let items: Vec<RawEvent> = LocalStorage::load_document(&path).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn reads_bare_array_seed_files() {
        let ctx = TestContext::new();
        let path = ctx.get_events_path().unwrap();
        fs::write(
            &path,
            r#"[{"id": 1, "title": "Photography Basics", "category": "Workshop", "date": "2025-06-10T11:00:00"}]"#,
        )
        .unwrap();

        let items: Vec<RawEvent> = LocalStorage::load_document(&path).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, Some(serde_json::json!("Photography Basics")));
    }

    #[test]
    fn saved_documents_are_versioned() {
        let ctx = TestContext::new();
        let path = ctx.get_events_path().unwrap();
        let raw = RawEvent {
            title: Some(serde_json::json!("Studio Night")),
            ..Default::default()
        };
        LocalStorage::save_document(&path, std::slice::from_ref(&raw)).unwrap();

        let json = fs::read_to_string(&path).unwrap();
        assert!(json.contains("\"version\": 1"));
        let items: Vec<RawEvent> = LocalStorage::load_document(&path).unwrap();
        assert_eq!(items, vec![raw]);
    }

    #[test]
    fn refuses_to_overwrite_unreadable_document() {
        let ctx = TestContext::new();
        let path = ctx.get_events_path().unwrap();
        fs::write(&path, "{ this is not json").unwrap();

        assert!(LocalStorage::load_document::<RawEvent>(&path).is_err());
        assert!(LocalStorage::save_document::<RawEvent>(&path, &[]).is_err());
        // The broken file is left for the user to repair.
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ this is not json");
    }

    #[test]
    fn rejects_documents_from_newer_versions() {
        let ctx = TestContext::new();
        let path = ctx.get_events_path().unwrap();
        fs::write(&path, r#"{"version": 99, "items": []}"#).unwrap();
        assert!(LocalStorage::load_document::<RawEvent>(&path).is_err());
    }

    #[test]
    fn concurrent_updates_keep_every_item() {
        let ctx = TestContext::new();
        let path = ctx.get_events_path().unwrap();

        let writers: Vec<_> = (0..4)
            .map(|w| {
                let path = path.clone();
                std::thread::spawn(move || {
                    for i in 0..25 {
                        LocalStorage::update_document(&path, |items: &mut Vec<u32>| {
                            items.push(w * 100 + i)
                        })
                        .unwrap();
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        let items: Vec<u32> = LocalStorage::load_document(&path).unwrap();
        assert_eq!(items.len(), 100);
    }

    #[test]
    fn update_leaves_unreadable_document_alone() {
        let ctx = TestContext::new();
        let path = ctx.get_events_path().unwrap();
        fs::write(&path, "[1, 2").unwrap();

        let result = LocalStorage::update_document(&path, |items: &mut Vec<u32>| items.push(3));
        assert!(result.is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "[1, 2");
    }
}
