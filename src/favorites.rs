//! Saved quotes.
//!
//! Favorites live in a small JSON key-value file: a top-level object whose
//! [`FAVORITES_KEY`] entry holds the array of saved quotes. Other keys in
//! the file are left alone.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::StorageError;
use crate::models::Quote;

pub const FAVORITES_KEY: &str = "quotesphere_favorites";

pub type Result<T> = std::result::Result<T, StorageError>;

pub trait FavoritesStore: Send + Sync {
    fn load_favorites(&self) -> Result<Vec<Quote>>;

    /// Append `quote` unless an entry with the same text and author exists.
    ///
    /// Returns `false` (and leaves storage untouched) for a duplicate.
    fn save_favorite(&self, quote: &Quote) -> Result<bool>;

    /// Remove the entry matching `quote`'s text and author, if present.
    fn remove_favorite(&self, quote: &Quote) -> Result<bool>;
}

// ---------------------------------------------------------------------------
// JSON file
// ---------------------------------------------------------------------------

pub struct JsonFileStore {
    path: PathBuf,
    // Serialises read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<Map<String, Value>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write_document(&self, doc: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(doc)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn favorites_in(doc: &Map<String, Value>) -> Result<Vec<Quote>> {
        match doc.get(FAVORITES_KEY) {
            Some(v) => Ok(serde_json::from_value(v.clone())?),
            None => Ok(Vec::new()),
        }
    }

    fn modify<F>(&self, f: F) -> Result<bool>
    where
        F: FnOnce(&mut Vec<Quote>) -> bool,
    {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut doc = self.read_document()?;
        let mut favorites = Self::favorites_in(&doc)?;
        if !f(&mut favorites) {
            return Ok(false);
        }
        doc.insert(FAVORITES_KEY.to_string(), serde_json::to_value(&favorites)?);
        self.write_document(&doc)?;
        Ok(true)
    }
}

impl FavoritesStore for JsonFileStore {
    fn load_favorites(&self) -> Result<Vec<Quote>> {
        Self::favorites_in(&self.read_document()?)
    }

    fn save_favorite(&self, quote: &Quote) -> Result<bool> {
        let saved = self.modify(|favorites| add_unique(favorites, quote))?;
        if saved {
            info!(author = %quote.author, "favorite saved");
        } else {
            debug!(author = %quote.author, "favorite already saved");
        }
        Ok(saved)
    }

    fn remove_favorite(&self, quote: &Quote) -> Result<bool> {
        self.modify(|favorites| remove_matching(favorites, quote))
    }
}

// ---------------------------------------------------------------------------
// In memory
// ---------------------------------------------------------------------------

/// Favorites kept for the lifetime of the process only.
#[derive(Default)]
pub struct MemoryStore {
    favorites: Mutex<Vec<Quote>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn favorites(&self) -> std::sync::MutexGuard<'_, Vec<Quote>> {
        self.favorites
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl FavoritesStore for MemoryStore {
    fn load_favorites(&self) -> Result<Vec<Quote>> {
        Ok(self.favorites().clone())
    }

    fn save_favorite(&self, quote: &Quote) -> Result<bool> {
        Ok(add_unique(&mut self.favorites(), quote))
    }

    fn remove_favorite(&self, quote: &Quote) -> Result<bool> {
        Ok(remove_matching(&mut self.favorites(), quote))
    }
}

fn add_unique(favorites: &mut Vec<Quote>, quote: &Quote) -> bool {
    if favorites.iter().any(|f| f.same_entry(quote)) {
        return false;
    }
    favorites.push(quote.clone());
    true
}

fn remove_matching(favorites: &mut Vec<Quote>, quote: &Quote) -> bool {
    let before = favorites.len();
    favorites.retain(|f| !f.same_entry(quote));
    favorites.len() != before
}
