use std::path::Path;

use anyhow::{Context, Result};

use mnemo_lib::concepts::{ConceptExtractor, KnowledgeGraph};
use mnemo_lib::flashcards::CardStore;
use mnemo_lib::notes::NoteStorage;
use mnemo_lib::{FileStorage, Settings};

/// Shared application state for CLI commands
pub struct App {
    pub storage: FileStorage,
    pub settings: Settings,
    pub cards: CardStore,
    pub graph: KnowledgeGraph,
    pub notes: NoteStorage,
    pub extractor: ConceptExtractor,
}

impl App {
    /// Load settings and snapshots from the data directory
    pub fn new(data_dir: Option<&Path>) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir.to_path_buf(),
            None => FileStorage::default_data_dir().context("Failed to get data directory")?,
        };

        let storage = FileStorage::new(data_dir);
        storage.init().context("Failed to initialize data directory")?;

        let settings = Settings::load(&storage.settings_path()).context("Failed to load settings")?;
        let cards = storage
            .load_cards(settings.scheduler.clone())
            .context("Failed to load cards")?;
        let graph = storage.load_graph().context("Failed to load concept graph")?;
        let notes = NoteStorage::new(storage.notes_path());
        let extractor = ConceptExtractor::new(&settings.extractor);

        log::debug!("Using data directory {}", storage.base_path().display());

        Ok(Self {
            storage,
            settings,
            cards,
            graph,
            notes,
            extractor,
        })
    }

    pub fn save_cards(&self) -> Result<()> {
        self.storage.save_cards(&self.cards).context("Failed to save cards")
    }
}
