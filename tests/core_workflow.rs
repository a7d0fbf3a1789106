use std::collections::BTreeSet;

use chrono::{Duration, TimeZone, Utc};
use tempfile::TempDir;

use mnemo_lib::concepts::{ConceptExtractor, InsightConfig, InsightGenerator, KnowledgeGraph};
use mnemo_lib::flashcards::{CardStore, FlashcardError, ReviewQuality, SchedulerConfig};
use mnemo_lib::notes::{process_note, CaptureRequest, NoteStorage};
use mnemo_lib::{FileStorage, Settings};

fn set(words: &[&str]) -> BTreeSet<String> {
    words.iter().map(|w| w.to_string()).collect()
}

#[test]
fn three_good_reviews_follow_sm2() {
    let start = Utc.with_ymd_and_hms(2026, 1, 5, 8, 0, 0).unwrap();
    let mut store = CardStore::new(SchedulerConfig::default());
    let id = store
        .create_card_at("Ebbinghaus curve?", "Exponential memory decay", vec!["memory".to_string()], start)
        .unwrap();

    let first = store.review(id, ReviewQuality::Good, start).unwrap().state.clone();
    assert_eq!((first.repetitions, first.interval_days), (1, 1.0));

    let second = store.review(id, ReviewQuality::Good, first.due_date).unwrap().state.clone();
    assert_eq!((second.repetitions, second.interval_days), (2, 6.0));

    let third = store.review(id, ReviewQuality::Good, second.due_date).unwrap().state.clone();
    assert_eq!(third.interval_days, (6.0 * second.ease_factor).round());
    assert_eq!(third.due_date, second.due_date + Duration::days(15));
}

#[test]
fn ease_never_drops_below_minimum() {
    let now = Utc::now();
    let mut store = CardStore::new(SchedulerConfig::default());
    let id = store.create_card_at("q", "a", Vec::new(), now).unwrap();

    for i in 0..20 {
        let quality = if i % 3 == 0 { ReviewQuality::Hard } else { ReviewQuality::Again };
        let card = store.review(id, quality, now).unwrap();
        assert!(card.state.ease_factor >= 1.3);
    }
}

#[test]
fn long_easy_streak_keeps_reviewing() {
    let now = Utc::now();
    let config = SchedulerConfig::default();
    let max_interval = config.max_interval_days;
    let mut store = CardStore::new(config);
    let id = store.create_card_at("q", "a", Vec::new(), now).unwrap();

    for _ in 0..50 {
        let card = store.review(id, ReviewQuality::Easy, now).unwrap();
        assert!(card.state.interval_days <= max_interval);
        assert!(card.state.due_date > now);
    }
    assert_eq!(store.card_stats(id).unwrap().interval_days, max_interval);
    assert_eq!(store.list_cards().len(), 1);
}

#[test]
fn review_of_unknown_card_is_not_found() {
    let mut store = CardStore::new(SchedulerConfig::default());
    let result = store.review(uuid::Uuid::new_v4(), ReviewQuality::Easy, Utc::now());
    assert!(matches!(result, Err(FlashcardError::CardNotFound(_))));
}

#[test]
fn graph_scenario_and_insight() {
    let mut graph = KnowledgeGraph::new();
    graph.add_content("c1", &set(&["memory", "sleep"]));
    graph.add_content("c2", &set(&["memory", "dream"]));

    assert_eq!(
        graph.neighbors("memory", 1),
        vec![("dream".to_string(), 1), ("sleep".to_string(), 1)]
    );
    assert_eq!(graph.neighbors("sleep", 1), vec![("memory".to_string(), 1)]);

    let insights = InsightGenerator::new(&graph, &InsightConfig::default()).generate(&set(&["memory"]), 1);
    assert_eq!(insights.len(), 1);
    assert_eq!(insights[0].concept_b, "dream");
}

#[test]
fn notes_feed_graph_and_survive_restart() {
    let temp = TempDir::new().unwrap();
    let storage = FileStorage::new(temp.path().to_path_buf());
    storage.init().unwrap();
    let settings = Settings::load(&storage.settings_path()).unwrap();
    let extractor = ConceptExtractor::new(&settings.extractor);
    let notes = NoteStorage::new(storage.notes_path());

    let mut graph = storage.load_graph().unwrap();
    for (title, content) in [
        ("Memory", "Spaced repetition strengthens memory."),
        ("Sleep", "Sleep consolidates memory every night."),
        ("Motivation", "Autonomy and competence drive motivation."),
    ] {
        let note = notes
            .capture(CaptureRequest {
                title: title.to_string(),
                content: content.to_string(),
                ..Default::default()
            })
            .unwrap();
        process_note(&notes, note.id, &extractor, &mut graph, |g| storage.save_graph(g)).unwrap();
    }

    let reloaded = storage.load_graph().unwrap();
    assert_eq!(reloaded.frequency("memory"), 2);
    assert_eq!(reloaded.edge_weight("memory", "sleep"), 1);
    assert_eq!(reloaded.neighbors("memory", 1), graph.neighbors("memory", 1));

    let insights = InsightGenerator::new(&reloaded, &settings.insights).generate(&set(&["sleep"]), 3);
    assert_eq!(insights.len(), 3);
    assert_eq!(insights[0].concept_b, "memory");

    let mut cards = storage.load_cards(settings.scheduler.clone()).unwrap();
    let id = cards.create_card("What consolidates memory?", "Sleep", Vec::new()).unwrap();
    storage.save_cards(&cards).unwrap();
    cards = storage.load_cards(settings.scheduler).unwrap();
    assert_eq!(cards.get_card(id).unwrap().back, "Sleep");
}
