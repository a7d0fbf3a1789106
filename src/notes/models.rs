//! Note repository data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of captured content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum NoteKind {
    Article,
    Paper,
    Video,
    Podcast,
    Book,
    #[default]
    Note,
    Idea,
    Quote,
}

impl NoteKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::Paper => "paper",
            Self::Video => "video",
            Self::Podcast => "podcast",
            Self::Book => "book",
            Self::Note => "note",
            Self::Idea => "idea",
            Self::Quote => "quote",
        }
    }
}

impl std::str::FromStr for NoteKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "article" => Ok(Self::Article),
            "paper" => Ok(Self::Paper),
            "video" => Ok(Self::Video),
            "podcast" => Ok(Self::Podcast),
            "book" => Ok(Self::Book),
            "note" => Ok(Self::Note),
            "idea" => Ok(Self::Idea),
            "quote" => Ok(Self::Quote),
            other => Err(format!("unknown note kind '{}'", other)),
        }
    }
}

/// A captured piece of content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub kind: NoteKind,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Set once the note has been fed into the concept graph
    #[serde(default)]
    pub processed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub concepts: Vec<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub key_quotes: Vec<String>,
}

impl Note {
    pub fn new(title: String, content: String, kind: NoteKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            content,
            kind,
            tags: Vec::new(),
            source_url: None,
            author: None,
            created_at: Utc::now(),
            processed_at: None,
            concepts: Vec::new(),
            summary: None,
            key_quotes: Vec::new(),
        }
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn is_processed(&self) -> bool {
        self.processed_at.is_some()
    }
}

/// Request to capture a new note
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureRequest {
    pub title: String,
    pub content: String,
    pub kind: Option<NoteKind>,
    pub tags: Option<Vec<String>>,
    pub source_url: Option<String>,
    pub author: Option<String>,
}

/// A note matching a search query
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteSearchHit {
    pub id: Uuid,
    pub title: String,
    pub summary: Option<String>,
    pub kind: NoteKind,
    pub score: u32,
}

/// A note sharing concepts with another one
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedNote {
    pub id: Uuid,
    pub title: String,
    /// Jaccard overlap of the two concept sets
    pub similarity: f64,
}
