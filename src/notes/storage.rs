//! Note storage implementation

use std::path::PathBuf;

use uuid::Uuid;

use super::models::*;
use crate::storage::{read_json_or_default, write_json, Result, StorageError};

/// Storage for notes, kept in a single JSON array file
pub struct NoteStorage {
    notes_file: PathBuf,
}

impl NoteStorage {
    pub fn new(notes_file: PathBuf) -> Self {
        Self { notes_file }
    }

    /// List all notes in capture order
    pub fn list_notes(&self) -> Result<Vec<Note>> {
        read_json_or_default(&self.notes_file)
    }

    pub fn get_note(&self, id: Uuid) -> Result<Note> {
        self.list_notes()?
            .into_iter()
            .find(|n| n.id == id)
            .ok_or_else(|| StorageError::NotFound(format!("Note {} not found", id)))
    }

    /// Capture a new note
    pub fn capture(&self, request: CaptureRequest) -> Result<Note> {
        let title = request.title.trim().to_string();
        if title.is_empty() {
            return Err(StorageError::Validation("note title must not be empty".to_string()));
        }
        if request.content.trim().is_empty() {
            return Err(StorageError::Validation("note content must not be empty".to_string()));
        }

        let mut note = Note::new(title, request.content, request.kind.unwrap_or_default());
        if let Some(tags) = request.tags {
            note = note.with_tags(tags);
        }
        note.source_url = request.source_url;
        note.author = request.author;

        let mut notes = self.list_notes()?;
        notes.push(note.clone());
        self.save_notes(&notes)?;

        log::info!("Captured note {} ({})", note.id, note.kind.as_str());
        Ok(note)
    }

    /// Replace an existing note
    pub fn save_note(&self, note: &Note) -> Result<()> {
        let mut notes = self.list_notes()?;
        let existing = notes
            .iter_mut()
            .find(|n| n.id == note.id)
            .ok_or_else(|| StorageError::NotFound(format!("Note {} not found", note.id)))?;
        *existing = note.clone();
        self.save_notes(&notes)
    }

    fn save_notes(&self, notes: &[Note]) -> Result<()> {
        write_json(&self.notes_file, notes)
    }

    /// Case-insensitive search. Title hits score 3, summary 2, content 1.
    pub fn search(&self, query: &str) -> Result<Vec<NoteSearchHit>> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let mut hits: Vec<NoteSearchHit> = self
            .list_notes()?
            .into_iter()
            .filter_map(|note| {
                let mut score = 0;
                if note.title.to_lowercase().contains(&query) {
                    score += 3;
                }
                if note
                    .summary
                    .as_deref()
                    .is_some_and(|s| s.to_lowercase().contains(&query))
                {
                    score += 2;
                }
                if note.content.to_lowercase().contains(&query) {
                    score += 1;
                }
                (score > 0).then(|| NoteSearchHit {
                    id: note.id,
                    title: note.title,
                    summary: note.summary,
                    kind: note.kind,
                    score,
                })
            })
            .collect();

        // Stable: equal scores keep capture order
        hits.sort_by(|a, b| b.score.cmp(&a.score));
        Ok(hits)
    }
}
