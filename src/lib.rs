pub mod concepts;
pub mod config;
pub mod flashcards;
pub mod notes;
pub mod storage;

pub use config::Settings;
pub use storage::{FileStorage, StorageError};
