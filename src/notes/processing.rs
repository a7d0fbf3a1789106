//! Capture-to-concept processing for notes

use std::collections::BTreeSet;

use chrono::Utc;
use regex::Regex;
use uuid::Uuid;

use super::models::{Note, RelatedNote};
use super::storage::NoteStorage;
use crate::concepts::{ConceptExtractor, KnowledgeGraph};
use crate::storage::{Result, StorageError};

const SUMMARY_SENTENCES: usize = 3;
const MAX_KEY_QUOTES: usize = 5;
const MAX_RELATED: usize = 5;
const RELATED_THRESHOLD: f64 = 0.1;
const IMPORTANT_KEYWORDS: &[&str] = &["important", "key", "crucial", "essential", "fundamental", "critical"];

fn sentences(content: &str) -> Vec<&str> {
    let re = Regex::new(r"[.!?]+").unwrap();
    re.split(content).map(str::trim).filter(|s| !s.is_empty()).collect()
}

/// The first few sentences of `content`
pub fn summarize(content: &str) -> String {
    let first: Vec<&str> = sentences(content).into_iter().take(SUMMARY_SENTENCES).collect();
    if first.is_empty() {
        return String::new();
    }
    format!("{}.", first.join(". "))
}

/// Mid-length sentences that mention an "importance" keyword
pub fn key_quotes(content: &str) -> Vec<String> {
    sentences(content)
        .into_iter()
        .filter(|s| {
            let len = s.chars().count();
            len > 20 && len < 200
        })
        .filter(|s| {
            let lower = s.to_lowercase();
            IMPORTANT_KEYWORDS.iter().any(|k| lower.contains(k))
        })
        .take(MAX_KEY_QUOTES)
        .map(str::to_string)
        .collect()
}

/// Extract a note's concepts and feed them into the graph.
///
/// The updated graph is handed to `save_graph` before the note is written
/// back as processed. If either write fails, `graph` and the stored note keep
/// their previous contents and the note can be processed again.
///
/// A note is processed at most once; a second call fails with a validation
/// error and leaves both the note and the graph untouched.
pub fn process_note<F>(
    storage: &NoteStorage,
    note_id: Uuid,
    extractor: &ConceptExtractor,
    graph: &mut KnowledgeGraph,
    save_graph: F,
) -> Result<Note>
where
    F: Fn(&KnowledgeGraph) -> Result<()>,
{
    let mut note = storage.get_note(note_id)?;
    if note.is_processed() {
        return Err(StorageError::Validation(format!("Note {} was already processed", note_id)));
    }

    let text = format!("{}\n{}", note.title, note.content);
    let concepts = extractor.extract(&text);

    note.concepts = concepts.iter().cloned().collect();
    note.summary = Some(summarize(&note.content));
    note.key_quotes = key_quotes(&note.content);
    note.processed_at = Some(Utc::now());

    let mut updated = graph.clone();
    updated.add_content(&note_id.to_string(), &concepts);
    save_graph(&updated)?;

    if let Err(e) = storage.save_note(&note) {
        if let Err(restore) = save_graph(graph) {
            log::error!("Failed to restore concept graph after note {} was not saved: {}", note_id, restore);
        }
        return Err(e);
    }

    *graph = updated;
    log::info!("Processed note {}: {} concepts", note_id, concepts.len());
    Ok(note)
}

/// Processed notes sharing concepts with `note_id`, most similar first
pub fn related_notes(notes: &[Note], note_id: Uuid) -> Result<Vec<RelatedNote>> {
    let note = notes
        .iter()
        .find(|n| n.id == note_id)
        .ok_or_else(|| StorageError::NotFound(format!("Note {} not found", note_id)))?;
    let concepts: BTreeSet<&String> = note.concepts.iter().collect();
    if concepts.is_empty() {
        return Ok(Vec::new());
    }

    let mut related: Vec<RelatedNote> = notes
        .iter()
        .filter(|other| other.id != note_id && !other.concepts.is_empty())
        .filter_map(|other| {
            let other_concepts: BTreeSet<&String> = other.concepts.iter().collect();
            let overlap = concepts.intersection(&other_concepts).count();
            let union = concepts.union(&other_concepts).count();
            let similarity = overlap as f64 / union as f64;
            (similarity > RELATED_THRESHOLD).then(|| RelatedNote {
                id: other.id,
                title: other.title.clone(),
                similarity,
            })
        })
        .collect();

    related.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    related.truncate(MAX_RELATED);
    Ok(related)
}
