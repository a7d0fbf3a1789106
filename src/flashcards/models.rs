//! Data models for the flashcard system

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How well a card was recalled during a review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReviewQuality {
    /// Forgotten
    Again,
    /// Recalled only partially
    Hard,
    /// Recalled with some effort
    Good,
    /// Recalled effortlessly
    Easy,
}

impl ReviewQuality {
    pub const ALL: [ReviewQuality; 4] = [Self::Again, Self::Hard, Self::Good, Self::Easy];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Again => "again",
            Self::Hard => "hard",
            Self::Good => "good",
            Self::Easy => "easy",
        }
    }
}

impl std::fmt::Display for ReviewQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReviewQuality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "again" | "0" => Ok(Self::Again),
            "hard" | "1" => Ok(Self::Hard),
            "good" | "2" => Ok(Self::Good),
            "easy" | "3" => Ok(Self::Easy),
            other => Err(format!("unknown review quality '{}'", other)),
        }
    }
}

/// Status of a card in the spaced repetition system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum CardStatus {
    /// Never reviewed
    #[default]
    New,
    /// In initial learning phase
    Learning,
    /// Regular spaced review
    Review,
    /// Failed and re-learning
    Relearning,
}

/// Scheduling state of a card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardState {
    /// Consecutive successful reviews
    #[serde(default)]
    pub repetitions: u32,
    /// SM-2 ease factor (default 2.5)
    #[serde(default = "default_ease_factor")]
    pub ease_factor: f64,
    /// Current interval in days, fractional values allowed
    #[serde(default)]
    pub interval_days: f64,
    /// When the card is due for review
    pub due_date: DateTime<Utc>,
    #[serde(default)]
    pub last_reviewed: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: CardStatus,
    /// Number of failed reviews
    #[serde(default)]
    pub lapses: u32,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub correct_count: u32,
}

fn default_ease_factor() -> f64 {
    2.5
}

impl CardState {
    pub fn new(now: DateTime<Utc>, initial_ease: f64) -> Self {
        Self {
            repetitions: 0,
            ease_factor: initial_ease,
            interval_days: 0.0,
            due_date: now,
            last_reviewed: None,
            status: CardStatus::New,
            lapses: 0,
            review_count: 0,
            correct_count: 0,
        }
    }

    /// Check if the card is due at the given instant
    pub fn is_due(&self, as_of: DateTime<Utc>) -> bool {
        self.due_date <= as_of
    }

    /// Check the scheduling invariants, returning the first violation found
    pub fn check_invariants(&self, min_ease: f64) -> Result<(), String> {
        if !self.ease_factor.is_finite() || self.ease_factor < min_ease {
            return Err(format!(
                "ease factor {} is below the minimum {}",
                self.ease_factor, min_ease
            ));
        }
        if !self.interval_days.is_finite() || self.interval_days < 0.0 {
            return Err(format!("interval {} is negative", self.interval_days));
        }
        if let Some(last) = self.last_reviewed {
            if self.due_date != super::algorithm::due_after(last, self.interval_days) {
                return Err("due date does not match last review plus interval".to_string());
            }
        }
        Ok(())
    }
}

/// A flashcard with question (front) and answer (back)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: Uuid,
    pub front: String,
    pub back: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub state: CardState,
    pub created_at: DateTime<Utc>,
}

impl Card {
    pub fn new(front: String, back: String, tags: Vec<String>, now: DateTime<Utc>, initial_ease: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            front,
            back,
            tags: normalize_tags(tags),
            state: CardState::new(now, initial_ease),
            created_at: now,
        }
    }

    /// Case-insensitive tag membership
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag.trim()))
    }
}

/// Trim tags, drop empties and duplicates while keeping first-seen order
fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if tag.is_empty() || out.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
            continue;
        }
        out.push(tag.to_string());
    }
    out
}

/// Whole-store snapshot used at the persistence boundary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSnapshot {
    #[serde(default)]
    pub cards: Vec<Card>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<DateTime<Utc>>,
}

/// Statistics for a single card
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardStats {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub last_reviewed: Option<DateTime<Utc>>,
    pub due_date: DateTime<Utc>,
    pub repetitions: u32,
    pub lapses: u32,
    pub ease_factor: f64,
    pub interval_days: f64,
    pub status: CardStatus,
    pub success_rate: f64,
}

/// Statistics across all cards
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    pub total_cards: usize,
    pub new_cards: usize,
    pub learning_cards: usize,
    pub review_cards: usize,
    pub due_cards: usize,
    pub total_reviews: u32,
    pub total_lapses: u32,
    pub success_rate: f64,
    pub average_ease: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_parse() {
        assert_eq!("Good".parse::<ReviewQuality>().unwrap(), ReviewQuality::Good);
        assert_eq!("0".parse::<ReviewQuality>().unwrap(), ReviewQuality::Again);
        assert!("perfect".parse::<ReviewQuality>().is_err());
    }

    #[test]
    fn test_new_card_defaults() {
        let now = Utc::now();
        let card = Card::new(
            "Q".to_string(),
            "A".to_string(),
            vec!["memory".to_string(), " Memory ".to_string(), "".to_string()],
            now,
            2.5,
        );

        assert_eq!(card.tags, vec!["memory".to_string()]);
        assert_eq!(card.state.repetitions, 0);
        assert_eq!(card.state.interval_days, 0.0);
        assert_eq!(card.state.due_date, now);
        assert!(card.state.last_reviewed.is_none());
        assert!(card.state.is_due(now));
        assert!(card.has_tag("MEMORY"));
    }

    #[test]
    fn test_invariants_reject_low_ease() {
        let mut state = CardState::new(Utc::now(), 2.5);
        assert!(state.check_invariants(1.3).is_ok());

        state.ease_factor = 1.1;
        assert!(state.check_invariants(1.3).is_err());
    }

    #[test]
    fn test_state_deserializes_with_defaults() {
        let json = r#"{"dueDate":"2026-01-01T00:00:00Z"}"#;
        let state: CardState = serde_json::from_str(json).unwrap();
        assert_eq!(state.ease_factor, 2.5);
        assert_eq!(state.status, CardStatus::New);
    }
}
