//! Note repository: capture, search and capture-to-concept processing

pub mod models;
pub mod processing;
pub mod storage;

pub use models::*;
pub use processing::{process_note, related_notes};
pub use storage::NoteStorage;
