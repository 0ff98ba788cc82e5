use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StoreError;

/// Storage capability for the favorites ledger.
///
/// Implementations decide durability; the ledger only asks to load the set at
/// startup and to save it when it changed.
pub trait FavoritesStore: Send {
    /// What: Read the persisted favorite ids.
    ///
    /// Output:
    /// - The stored set; an empty set when nothing was stored yet.
    ///
    /// # Errors
    /// - Implementation-specific read or decode failures.
    fn load(&self) -> Result<HashSet<String>, StoreError>;

    /// What: Replace the persisted favorite ids.
    ///
    /// Inputs:
    /// - `ids`: Current favorites
    ///
    /// # Errors
    /// - Implementation-specific write or encode failures.
    fn save(&self, ids: &HashSet<String>) -> Result<(), StoreError>;
}

/// Process-memory only; favorites vanish on restart.
#[derive(Debug, Default, Clone, Copy)]
pub struct MemoryFavorites;

impl FavoritesStore for MemoryFavorites {
    fn load(&self) -> Result<HashSet<String>, StoreError> {
        Ok(HashSet::new())
    }

    fn save(&self, _ids: &HashSet<String>) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Favorites persisted as a sorted JSON array of ids.
#[derive(Debug, Clone)]
pub struct JsonFavoritesFile {
    /// Target file.
    path: PathBuf,
}

impl JsonFavoritesFile {
    /// Persist favorites to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Target file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FavoritesStore for JsonFavoritesFile {
    fn load(&self) -> Result<HashSet<String>, StoreError> {
        if !self.path.is_file() {
            return Ok(HashSet::new());
        }
        let s = fs::read_to_string(&self.path).map_err(|e| StoreError::io(&self.path, e))?;
        let ids: Vec<String> = serde_json::from_str(&s)?;
        Ok(ids.into_iter().collect())
    }

    fn save(&self, ids: &HashSet<String>) -> Result<(), StoreError> {
        let mut sorted: Vec<&String> = ids.iter().collect();
        sorted.sort();
        let s = serde_json::to_string(&sorted)?;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }
        fs::write(&self.path, s).map_err(|e| StoreError::io(&self.path, e))
    }
}

/// Set of favorite product ids with a dirty flag for lazy persistence.
#[derive(Debug, Default, Clone)]
pub struct FavoritesLedger {
    /// Favorite product ids.
    ids: HashSet<String>,
    /// Set when `ids` changed since the last flush.
    dirty: bool,
}

impl FavoritesLedger {
    /// Ledger seeded with previously stored ids.
    #[must_use]
    pub const fn with_ids(ids: HashSet<String>) -> Self {
        Self { ids, dirty: false }
    }

    /// What: Flip membership of `id`.
    ///
    /// Inputs:
    /// - `id`: Product identifier
    ///
    /// Output:
    /// - `true` if `id` is a favorite after the call.
    pub fn toggle(&mut self, id: &str) -> bool {
        self.dirty = true;
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    /// O(1) membership test.
    #[must_use]
    pub fn is_favorite(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Number of favorites.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether no product is a favorite.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Favorite ids in sorted order.
    #[must_use]
    pub fn sorted_ids(&self) -> Vec<&str> {
        let mut v: Vec<&str> = self.ids.iter().map(String::as_str).collect();
        v.sort_unstable();
        v
    }

    /// Whether unsaved changes exist.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// What: Persist the ledger through `store` if marked dirty.
    ///
    /// Inputs:
    /// - `store`: Storage capability
    ///
    /// Output:
    /// - Saves the ids and clears the dirty flag.
    ///
    /// Details:
    /// - Write failures are logged, not propagated; the flag is cleared either way
    ///   to avoid retrying the same failing write on every command.
    pub fn maybe_flush(&mut self, store: &dyn FavoritesStore) {
        if !self.dirty {
            return;
        }
        match store.save(&self.ids) {
            Ok(()) => {
                tracing::debug!(count = self.ids.len(), "[Favorites] Favorites persisted");
            }
            Err(e) => {
                tracing::warn!(error = %e, "[Favorites] Failed to persist favorites");
            }
        }
        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// What: Toggle is its own inverse
    ///
    /// - Input: Toggle "p1" twice
    /// - Output: Favorite after the first, not after the second
    fn toggle_twice_restores() {
        let mut l = FavoritesLedger::default();
        assert!(l.toggle("p1"));
        assert!(l.is_favorite("p1"));
        assert!(!l.toggle("p1"));
        assert!(!l.is_favorite("p1"));
        assert!(l.is_empty());
    }

    #[test]
    /// What: JSON file store round-trips through flush and load
    ///
    /// - Input: Two favorites flushed into a nested temp path
    /// - Output: File holds sorted ids; load returns the same set; dirty cleared
    fn json_store_flush_and_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFavoritesFile::new(dir.path().join("nested").join("favorites.json"));
        assert!(store.load().expect("missing file loads empty").is_empty());
        let mut l = FavoritesLedger::default();
        l.toggle("p9");
        l.toggle("p2");
        assert!(l.is_dirty());
        l.maybe_flush(&store);
        assert!(!l.is_dirty());
        let raw = fs::read_to_string(store.path()).expect("file written");
        assert_eq!(raw, r#"["p2","p9"]"#);
        let loaded = FavoritesLedger::with_ids(store.load().expect("file loads"));
        assert_eq!(loaded.sorted_ids(), vec!["p2", "p9"]);
    }

    #[test]
    /// What: Memory store never persists
    ///
    /// - Input: Flush through MemoryFavorites, then load
    /// - Output: Empty set
    fn memory_store_is_ephemeral() {
        let mut l = FavoritesLedger::default();
        l.toggle("p1");
        l.maybe_flush(&MemoryFavorites);
        assert!(MemoryFavorites.load().expect("memory load").is_empty());
    }
}
