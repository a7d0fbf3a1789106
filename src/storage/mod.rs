mod file_storage;

pub use file_storage::{FileStorage, Result, StorageError, DATA_DIR_ENV};
pub(crate) use file_storage::{read_json_or_default, write_json};
