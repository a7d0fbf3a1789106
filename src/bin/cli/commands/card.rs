use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use uuid::Uuid;

use mnemo_lib::flashcards::algorithm::{format_interval, preview_intervals};
use mnemo_lib::flashcards::{Card, ReviewQuality};

use crate::app::App;
use crate::render::terminal::{describe_due, paint, truncate, Color};
use crate::OutputFormat;

fn card_json(card: &Card) -> serde_json::Value {
    serde_json::json!({
        "id": card.id.to_string(),
        "front": card.front,
        "back": card.back,
        "tags": card.tags,
        "repetitions": card.state.repetitions,
        "easeFactor": card.state.ease_factor,
        "intervalDays": card.state.interval_days,
        "dueDate": card.state.due_date.to_rfc3339(),
        "status": card.state.status,
    })
}

pub fn run_add(app: &mut App, front: &str, back: &str, tags: Vec<String>, format: &OutputFormat) -> Result<()> {
    let id = app.cards.create_card(front, back, tags)?;
    app.save_cards()?;
    let card = app.cards.get_card(id)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&card_json(card))?),
        OutputFormat::Plain => {
            println!("Created card: \"{}\"", card.front);
            if !card.tags.is_empty() {
                println!("  Tags: {}", card.tags.iter().map(|t| format!("#{}", t)).collect::<Vec<_>>().join(" "));
            }
            println!("  ID: {}", card.id);
        }
    }
    Ok(())
}

pub fn run_due(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let now = Utc::now();
    let due = app.cards.get_due_cards(now);

    match format {
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = due.iter().map(|c| card_json(c)).collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if due.is_empty() {
                println!("No cards due.");
                return Ok(());
            }
            println!("{} card{} due:", due.len(), if due.len() == 1 { "" } else { "s" });
            for card in due {
                let preview = preview_intervals(&card.state, app.cards.config());
                println!(
                    "  {}  {}  {}",
                    paint(&card.id.to_string(), Color::GRAY, use_color),
                    truncate(&card.front, 50),
                    paint(&describe_due(card.state.due_date, now), Color::YELLOW, use_color),
                );
                println!(
                    "      again {} | hard {} | good {} | easy {}",
                    format_interval(preview[0]),
                    format_interval(preview[1]),
                    format_interval(preview[2]),
                    format_interval(preview[3]),
                );
            }
        }
    }
    Ok(())
}

pub fn run_review(
    app: &mut App,
    id: Uuid,
    quality: ReviewQuality,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let now = Utc::now();
    let output = {
        let card = app.cards.review(id, quality, now)?;
        match format {
            OutputFormat::Json => serde_json::to_string_pretty(&card_json(card))?,
            OutputFormat::Plain => {
                let color = if quality == ReviewQuality::Again { Color::RED } else { Color::GREEN };
                format!(
                    "{} \"{}\"\n  Answer: {}\n  Next review {} (interval {}, ease {:.2})",
                    paint(&format!("Reviewed ({})", quality), color, use_color),
                    card.front,
                    card.back,
                    describe_due(card.state.due_date, now),
                    format_interval(card.state.interval_days),
                    card.state.ease_factor,
                )
            }
        }
    };
    app.save_cards()?;
    println!("{}", output);
    Ok(())
}

pub fn run_search(app: &App, query: &str, tags: &[String], format: &OutputFormat) -> Result<()> {
    let results = app.cards.search_cards(query, tags);

    match format {
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = results.iter().map(|c| card_json(c)).collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if results.is_empty() {
                println!("No matching cards.");
                return Ok(());
            }
            for card in results {
                println!("{}  {}  ->  {}", card.id, truncate(&card.front, 40), truncate(&card.back, 40));
            }
        }
    }
    Ok(())
}

pub fn run_stats(app: &App, id: Option<Uuid>, format: &OutputFormat) -> Result<()> {
    match id {
        Some(id) => {
            let stats = app.cards.card_stats(id)?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
                OutputFormat::Plain => {
                    println!("Card {}", stats.id);
                    println!("  Status:       {:?}", stats.status);
                    println!("  Repetitions:  {}", stats.repetitions);
                    println!("  Lapses:       {}", stats.lapses);
                    println!("  Ease factor:  {:.2}", stats.ease_factor);
                    println!("  Interval:     {}", format_interval(stats.interval_days));
                    println!("  Success rate: {:.0}%", stats.success_rate * 100.0);
                    println!("  Due:          {}", stats.due_date.to_rfc3339());
                }
            }
        }
        None => {
            let stats = app.cards.overall_stats(Utc::now());
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
                OutputFormat::Plain => {
                    println!("Cards:        {}", stats.total_cards);
                    println!("  New:        {}", stats.new_cards);
                    println!("  Learning:   {}", stats.learning_cards);
                    println!("  Review:     {}", stats.review_cards);
                    println!("  Due now:    {}", stats.due_cards);
                    println!("Reviews:      {}", stats.total_reviews);
                    println!("Lapses:       {}", stats.total_lapses);
                    println!("Success rate: {:.0}%", stats.success_rate * 100.0);
                    println!("Average ease: {:.2}", stats.average_ease);
                }
            }
        }
    }
    Ok(())
}

pub fn run_export(app: &App, path: &Path) -> Result<()> {
    let count = app
        .storage
        .export_cards(&app.cards, path)
        .with_context(|| format!("Failed to export cards to {}", path.display()))?;
    println!("Exported {} cards to {}", count, path.display());
    Ok(())
}

pub fn run_import(app: &mut App, path: &Path) -> Result<()> {
    let count = app
        .storage
        .import_cards(&mut app.cards, path)
        .with_context(|| format!("Failed to import cards from {}", path.display()))?;
    app.save_cards()?;
    println!("Imported {} cards from {}", count, path.display());
    Ok(())
}
