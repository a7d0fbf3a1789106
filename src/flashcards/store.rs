//! In-memory card store
//!
//! Owns every [`Card`] record. Cards are kept in insertion order with an id
//! index on the side; the store never deletes cards.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use super::algorithm::{calculate_next_review, SchedulerConfig};
use super::models::*;

#[derive(Error, Debug)]
pub enum FlashcardError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Card not found: {0}")]
    CardNotFound(Uuid),

    #[error("Card {card_id} has invalid scheduling state: {reason}")]
    InvalidState { card_id: Uuid, reason: String },
}

pub type Result<T> = std::result::Result<T, FlashcardError>;

pub struct CardStore {
    cards: Vec<Card>,
    index: HashMap<Uuid, usize>,
    config: SchedulerConfig,
}

impl CardStore {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            cards: Vec::new(),
            index: HashMap::new(),
            config,
        }
    }

    /// Rebuild a store from a persisted snapshot
    pub fn from_snapshot(snapshot: CardSnapshot, config: SchedulerConfig) -> Self {
        let mut store = Self::new(config);
        let count = store.merge(snapshot);
        log::info!("Loaded {} cards", count);
        store
    }

    /// Copy of every card, in insertion order
    pub fn snapshot(&self) -> CardSnapshot {
        CardSnapshot {
            cards: self.cards.clone(),
            exported_at: None,
        }
    }

    /// Merge cards from a snapshot. Cards whose id already exists are
    /// replaced in place, new ones are appended. Returns the number merged.
    pub fn merge(&mut self, snapshot: CardSnapshot) -> usize {
        let count = snapshot.cards.len();
        for card in snapshot.cards {
            if let Err(reason) = card.state.check_invariants(self.config.min_ease) {
                log::warn!("Card {} loaded with invalid state: {}", card.id, reason);
            }
            match self.index.get(&card.id) {
                Some(&pos) => self.cards[pos] = card,
                None => {
                    self.index.insert(card.id, self.cards.len());
                    self.cards.push(card);
                }
            }
        }
        count
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    // ==================== Card Operations ====================

    /// Create a new card, due immediately
    pub fn create_card(&mut self, front: &str, back: &str, tags: Vec<String>) -> Result<Uuid> {
        self.create_card_at(front, back, tags, Utc::now())
    }

    pub fn create_card_at(
        &mut self,
        front: &str,
        back: &str,
        tags: Vec<String>,
        now: DateTime<Utc>,
    ) -> Result<Uuid> {
        let front = front.trim();
        let back = back.trim();
        if front.is_empty() {
            return Err(FlashcardError::Validation("card front must not be empty".to_string()));
        }
        if back.is_empty() {
            return Err(FlashcardError::Validation("card back must not be empty".to_string()));
        }

        let card = Card::new(
            front.to_string(),
            back.to_string(),
            tags,
            now,
            self.config.initial_ease,
        );
        let id = card.id;
        self.index.insert(id, self.cards.len());
        self.cards.push(card);

        log::info!("Created card {}", id);
        Ok(id)
    }

    pub fn get_card(&self, card_id: Uuid) -> Result<&Card> {
        self.index
            .get(&card_id)
            .map(|&pos| &self.cards[pos])
            .ok_or(FlashcardError::CardNotFound(card_id))
    }

    /// All cards in insertion order
    pub fn list_cards(&self) -> &[Card] {
        &self.cards
    }

    /// Cards due at `as_of`, oldest due date first
    pub fn get_due_cards(&self, as_of: DateTime<Utc>) -> Vec<&Card> {
        let mut due: Vec<&Card> = self.cards.iter().filter(|c| c.state.is_due(as_of)).collect();
        // Stable sort keeps insertion order among equal due dates
        due.sort_by_key(|c| c.state.due_date);
        due
    }

    /// Case-insensitive substring search over front and back text.
    ///
    /// When `tags` is non-empty a card must also carry at least one of them.
    pub fn search_cards(&self, query: &str, tags: &[String]) -> Vec<&Card> {
        let query = query.trim().to_lowercase();
        if query.is_empty() && tags.is_empty() {
            return self.list_cards().iter().collect();
        }
        self.cards
            .iter()
            .filter(|c| {
                query.is_empty()
                    || c.front.to_lowercase().contains(&query)
                    || c.back.to_lowercase().contains(&query)
            })
            .filter(|c| tags.is_empty() || tags.iter().any(|t| c.has_tag(t)))
            .collect()
    }

    // ==================== Review Operations ====================

    /// Replace a card's scheduling state after validating it
    pub fn update_from_review(&mut self, card_id: Uuid, new_state: CardState) -> Result<&Card> {
        let pos = *self
            .index
            .get(&card_id)
            .ok_or(FlashcardError::CardNotFound(card_id))?;

        new_state
            .check_invariants(self.config.min_ease)
            .map_err(|reason| FlashcardError::InvalidState { card_id, reason })?;

        let card = &mut self.cards[pos];
        card.state = new_state;
        Ok(card)
    }

    /// Submit a review for a card
    pub fn review(
        &mut self,
        card_id: Uuid,
        quality: ReviewQuality,
        reviewed_at: DateTime<Utc>,
    ) -> Result<&Card> {
        let current = &self.get_card(card_id)?.state;
        current
            .check_invariants(self.config.min_ease)
            .map_err(|reason| FlashcardError::InvalidState { card_id, reason })?;

        let next = calculate_next_review(current, quality, reviewed_at, &self.config);
        log::info!(
            "Reviewed card {} as {}: next due {} ({} days)",
            card_id,
            quality,
            next.due_date.to_rfc3339(),
            next.interval_days
        );
        self.update_from_review(card_id, next)
    }

    // ==================== Statistics ====================

    pub fn card_stats(&self, card_id: Uuid) -> Result<CardStats> {
        let card = self.get_card(card_id)?;
        let state = &card.state;
        Ok(CardStats {
            id: card.id,
            created_at: card.created_at,
            last_reviewed: state.last_reviewed,
            due_date: state.due_date,
            repetitions: state.repetitions,
            lapses: state.lapses,
            ease_factor: state.ease_factor,
            interval_days: state.interval_days,
            status: state.status,
            success_rate: ratio(state.correct_count, state.review_count),
        })
    }

    pub fn overall_stats(&self, as_of: DateTime<Utc>) -> ReviewStats {
        let mut stats = ReviewStats {
            total_cards: self.cards.len(),
            ..Default::default()
        };
        let mut correct = 0;
        let mut ease_sum = 0.0;

        for card in &self.cards {
            let state = &card.state;
            match state.status {
                CardStatus::New => stats.new_cards += 1,
                CardStatus::Learning => stats.learning_cards += 1,
                CardStatus::Review | CardStatus::Relearning => stats.review_cards += 1,
            }
            if state.is_due(as_of) {
                stats.due_cards += 1;
            }
            stats.total_reviews += state.review_count;
            stats.total_lapses += state.lapses;
            correct += state.correct_count;
            ease_sum += state.ease_factor;
        }

        stats.success_rate = ratio(correct, stats.total_reviews);
        if !self.cards.is_empty() {
            stats.average_ease = ease_sum / self.cards.len() as f64;
        }
        stats
    }
}

fn ratio(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        0.0
    } else {
        f64::from(part) / f64::from(whole)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
    }

    fn create_test_store() -> CardStore {
        CardStore::new(SchedulerConfig::default())
    }

    #[test]
    fn test_create_and_get_card() {
        let mut store = create_test_store();
        let id = store
            .create_card_at("What is SM-2?", "A scheduling algorithm", vec!["srs".to_string()], t0())
            .unwrap();

        let card = store.get_card(id).unwrap();
        assert_eq!(card.front, "What is SM-2?");
        assert_eq!(card.state.ease_factor, 2.5);
        assert_eq!(card.state.due_date, t0());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_create_rejects_empty_text() {
        let mut store = create_test_store();
        assert!(matches!(
            store.create_card("  ", "back", Vec::new()),
            Err(FlashcardError::Validation(_))
        ));
        assert!(matches!(
            store.create_card("front", "", Vec::new()),
            Err(FlashcardError::Validation(_))
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_list_cards_keeps_insertion_order() {
        let mut store = create_test_store();
        let later = store.create_card_at("later", "b", Vec::new(), t0() + Duration::days(1)).unwrap();
        let earlier = store.create_card_at("earlier", "b", Vec::new(), t0()).unwrap();

        let ids: Vec<Uuid> = store.list_cards().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![later, earlier]);

        let all: Vec<Uuid> = store.search_cards("  ", &[]).iter().map(|c| c.id).collect();
        assert_eq!(all, ids);
    }

    #[test]
    fn test_due_cards_sorted() {
        let mut store = create_test_store();
        let late = store.create_card_at("late", "b", Vec::new(), t0() + Duration::hours(2)).unwrap();
        let early = store.create_card_at("early", "b", Vec::new(), t0()).unwrap();
        let future = store.create_card_at("future", "b", Vec::new(), t0() + Duration::days(3)).unwrap();

        let due: Vec<Uuid> = store
            .get_due_cards(t0() + Duration::hours(2))
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(due, vec![early, late]);
        assert!(!due.contains(&future));
    }

    #[test]
    fn test_search_cards() {
        let mut store = create_test_store();
        let a = store
            .create_card_at("Ebbinghaus curve", "Memory decay", vec!["memory".to_string()], t0())
            .unwrap();
        let b = store
            .create_card_at("SDT needs", "Autonomy, competence", vec!["motivation".to_string()], t0())
            .unwrap();
        let c = store
            .create_card_at("Spacing effect", "memory is better when spaced", Vec::new(), t0())
            .unwrap();

        let ids = |cards: Vec<&Card>| cards.iter().map(|c| c.id).collect::<Vec<_>>();

        assert_eq!(ids(store.search_cards("MEMORY", &[])), vec![a, c]);
        assert_eq!(ids(store.search_cards("memory", &["Memory".to_string()])), vec![a]);
        assert_eq!(ids(store.search_cards("", &["motivation".to_string()])), vec![b]);
        assert!(store.search_cards("quantum", &[]).is_empty());
    }

    #[test]
    fn test_review_updates_card() {
        let mut store = create_test_store();
        let id = store.create_card_at("front", "back", Vec::new(), t0()).unwrap();

        let card = store.review(id, ReviewQuality::Good, t0()).unwrap();
        assert_eq!(card.state.repetitions, 1);
        assert_eq!(card.state.interval_days, 1.0);
        assert_eq!(card.state.due_date, t0() + Duration::days(1));

        assert!(store.get_due_cards(t0() + Duration::hours(1)).is_empty());
        assert_eq!(store.get_due_cards(t0() + Duration::days(1)).len(), 1);
    }

    #[test]
    fn test_review_missing_card() {
        let mut store = create_test_store();
        let missing = Uuid::new_v4();
        assert!(matches!(
            store.review(missing, ReviewQuality::Good, t0()),
            Err(FlashcardError::CardNotFound(id)) if id == missing
        ));
    }

    #[test]
    fn test_review_corrupted_state_leaves_card_untouched() {
        let mut card = Card::new("f".to_string(), "b".to_string(), Vec::new(), t0(), 2.5);
        card.state.ease_factor = 1.0;
        let id = card.id;
        let mut store = CardStore::from_snapshot(
            CardSnapshot {
                cards: vec![card.clone()],
                exported_at: None,
            },
            SchedulerConfig::default(),
        );

        assert!(matches!(
            store.review(id, ReviewQuality::Good, t0()),
            Err(FlashcardError::InvalidState { .. })
        ));
        assert_eq!(store.get_card(id).unwrap(), &card);
    }

    #[test]
    fn test_update_from_review_rejects_invalid_state() {
        let mut store = create_test_store();
        let id = store.create_card_at("f", "b", Vec::new(), t0()).unwrap();

        let mut bad = store.get_card(id).unwrap().state.clone();
        bad.interval_days = -1.0;
        assert!(store.update_from_review(id, bad).is_err());
        assert_eq!(store.get_card(id).unwrap().state.interval_days, 0.0);
    }

    #[test]
    fn test_stats() {
        let mut store = create_test_store();
        let a = store.create_card_at("a", "a", Vec::new(), t0()).unwrap();
        store.create_card_at("b", "b", Vec::new(), t0()).unwrap();

        store.review(a, ReviewQuality::Good, t0()).unwrap();
        store.review(a, ReviewQuality::Again, t0() + Duration::days(1)).unwrap();

        let card_stats = store.card_stats(a).unwrap();
        assert_eq!(card_stats.lapses, 1);
        assert_eq!(card_stats.repetitions, 0);
        assert!((card_stats.success_rate - 0.5).abs() < 1e-9);

        let stats = store.overall_stats(t0());
        assert_eq!(stats.total_cards, 2);
        assert_eq!(stats.new_cards, 1);
        assert_eq!(stats.learning_cards, 1);
        assert_eq!(stats.due_cards, 1);
        assert_eq!(stats.total_reviews, 2);
        assert_eq!(stats.total_lapses, 1);
        assert!((stats.average_ease - 2.4).abs() < 1e-9);
    }

    #[test]
    fn test_snapshot_merge_replaces_existing() {
        let mut store = create_test_store();
        let id = store.create_card_at("old", "b", Vec::new(), t0()).unwrap();

        let mut snapshot = store.snapshot();
        snapshot.cards[0].front = "new".to_string();
        snapshot
            .cards
            .push(Card::new("other".to_string(), "b".to_string(), Vec::new(), t0(), 2.5));

        assert_eq!(store.merge(snapshot), 2);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get_card(id).unwrap().front, "new");
    }
}
