//! Flashcard and spaced repetition system
//!
//! This module provides:
//! - Card records with their scheduling state
//! - SM-2 spaced repetition algorithm
//! - An in-memory card store with due/search/review operations

pub mod algorithm;
pub mod models;
pub mod store;

pub use algorithm::SchedulerConfig;
pub use models::*;
pub use store::{CardStore, FlashcardError};
