//! Whole-file JSON persistence for the card store and the concept graph
//!
//! Directory layout:
//! ```text
//! {data-dir}/
//! ├── settings.json   # Settings (optional)
//! ├── cards.json      # CardSnapshot
//! ├── graph.json      # GraphSnapshot
//! └── notes.json      # Array of notes
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::concepts::{GraphError, GraphSnapshot, KnowledgeGraph};
use crate::flashcards::{CardSnapshot, CardStore, FlashcardError, SchedulerConfig};

/// Environment variable overriding the default data directory
pub const DATA_DIR_ENV: &str = "MNEMO_DATA_DIR";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Flashcard(#[from] FlashcardError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("Data directory not found")]
    DataDirNotFound,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Get the default data directory
    pub fn default_data_dir() -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|d| !d.is_empty()) {
            return Ok(PathBuf::from(dir));
        }
        dirs::data_local_dir()
            .map(|p| p.join("mnemo"))
            .ok_or(StorageError::DataDirNotFound)
    }

    /// Initialize storage directories
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.base_path)?;
        Ok(())
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn settings_path(&self) -> PathBuf {
        self.base_path.join("settings.json")
    }

    fn cards_path(&self) -> PathBuf {
        self.base_path.join("cards.json")
    }

    fn graph_path(&self) -> PathBuf {
        self.base_path.join("graph.json")
    }

    pub fn notes_path(&self) -> PathBuf {
        self.base_path.join("notes.json")
    }

    // ===== Card Operations =====

    /// Load the card store, empty if nothing was saved yet
    pub fn load_cards(&self, config: SchedulerConfig) -> Result<CardStore> {
        let snapshot: CardSnapshot = read_json_or_default(&self.cards_path())?;
        Ok(CardStore::from_snapshot(snapshot, config))
    }

    pub fn save_cards(&self, store: &CardStore) -> Result<()> {
        write_json(&self.cards_path(), &store.snapshot())?;
        log::info!("Saved {} cards", store.len());
        Ok(())
    }

    /// Write every card to `path` with an export timestamp
    pub fn export_cards(&self, store: &CardStore, path: &Path) -> Result<usize> {
        let mut snapshot = store.snapshot();
        snapshot.exported_at = Some(Utc::now());
        write_json(path, &snapshot)?;
        log::info!("Exported {} cards to {}", snapshot.cards.len(), path.display());
        Ok(snapshot.cards.len())
    }

    /// Merge the cards in `path` into the store
    pub fn import_cards(&self, store: &mut CardStore, path: &Path) -> Result<usize> {
        if !path.exists() {
            return Err(StorageError::NotFound(format!("Import file {}", path.display())));
        }
        let content = fs::read_to_string(path)?;
        let snapshot: CardSnapshot = serde_json::from_str(&content)?;
        let count = store.merge(snapshot);
        log::info!("Imported {} cards from {}", count, path.display());
        Ok(count)
    }

    // ===== Graph Operations =====

    pub fn load_graph(&self) -> Result<KnowledgeGraph> {
        let snapshot: GraphSnapshot = read_json_or_default(&self.graph_path())?;
        Ok(KnowledgeGraph::from_snapshot(snapshot)?)
    }

    pub fn save_graph(&self, graph: &KnowledgeGraph) -> Result<()> {
        write_json(&self.graph_path(), &graph.snapshot())?;
        log::info!("Saved knowledge graph ({} concepts)", graph.node_count());
        Ok(())
    }
}

/// Read a JSON file, falling back to `T::default()` when it does not exist
pub(crate) fn read_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Ok(T::default());
    }
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

pub(crate) fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(value)?)?;
    Ok(())
}
