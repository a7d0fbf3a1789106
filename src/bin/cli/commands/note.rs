use anyhow::{Context, Result};
use uuid::Uuid;

use mnemo_lib::notes::{process_note, related_notes, CaptureRequest, NoteKind};

use crate::app::App;
use crate::render::terminal::{paint, paint_padded, truncate, Color};
use crate::OutputFormat;

#[allow(clippy::too_many_arguments)]
pub fn run_add(
    app: &App,
    title: String,
    content: String,
    kind: Option<NoteKind>,
    tags: Vec<String>,
    source_url: Option<String>,
    author: Option<String>,
    format: &OutputFormat,
) -> Result<()> {
    let note = app.notes.capture(CaptureRequest {
        title,
        content,
        kind,
        tags: Some(tags),
        source_url,
        author,
    })?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "id": note.id.to_string(),
                "title": note.title,
                "kind": note.kind,
                "tags": note.tags,
                "createdAt": note.created_at.to_rfc3339(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Captured note: \"{}\"", note.title);
            if !note.tags.is_empty() {
                println!("  Tags: {}", note.tags.iter().map(|t| format!("#{}", t)).collect::<Vec<_>>().join(" "));
            }
            println!("  ID: {}", note.id);
        }
    }
    Ok(())
}

pub fn run_process(app: &mut App, id: Uuid, format: &OutputFormat, use_color: bool) -> Result<()> {
    let storage = &app.storage;
    let note = process_note(&app.notes, id, &app.extractor, &mut app.graph, |g| storage.save_graph(g))
        .with_context(|| format!("Failed to process note {}", id))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&note)?),
        OutputFormat::Plain => {
            println!("Processed \"{}\"", note.title);
            println!("  Concepts: {}", paint(&note.concepts.join(", "), Color::CYAN, use_color));
            if let Some(summary) = &note.summary {
                println!("  Summary: {}", summary);
            }
            for quote in &note.key_quotes {
                println!("  > {}", quote);
            }
        }
    }
    Ok(())
}

pub fn run_list(app: &App, unprocessed: bool, format: &OutputFormat, use_color: bool) -> Result<()> {
    let notes: Vec<_> = app
        .notes
        .list_notes()?
        .into_iter()
        .filter(|n| !unprocessed || !n.is_processed())
        .collect();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&notes)?),
        OutputFormat::Plain => {
            if notes.is_empty() {
                println!("No notes{}.", if unprocessed { " (unprocessed)" } else { "" });
                return Ok(());
            }

            let title_width = notes.iter().map(|n| n.title.chars().count()).max().unwrap_or(5).clamp(5, 40);
            println!("{:<tw$} {:<8} {:<11} {}", "Title", "Kind", "Status", "ID", tw = title_width);
            for note in &notes {
                let status = if note.is_processed() {
                    paint_padded("processed", 11, Color::GREEN, use_color)
                } else {
                    paint_padded("captured", 11, Color::YELLOW, use_color)
                };
                println!(
                    "{:<tw$} {:<8} {} {}",
                    truncate(&note.title, title_width),
                    note.kind.as_str(),
                    status,
                    note.id,
                    tw = title_width
                );
            }
        }
    }
    Ok(())
}

pub fn run_search(app: &App, query: &str, format: &OutputFormat) -> Result<()> {
    let hits = app.notes.search(query)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&hits)?),
        OutputFormat::Plain => {
            if hits.is_empty() {
                println!("No notes matching '{}'.", query);
                return Ok(());
            }
            for hit in hits {
                println!("[{}] {}  ({})", hit.score, hit.title, hit.id);
                if let Some(summary) = hit.summary {
                    println!("    {}", truncate(&summary, 76));
                }
            }
        }
    }
    Ok(())
}

pub fn run_related(app: &App, id: Uuid, format: &OutputFormat) -> Result<()> {
    let notes = app.notes.list_notes()?;
    let related = related_notes(&notes, id)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&related)?),
        OutputFormat::Plain => {
            if related.is_empty() {
                println!("No related notes.");
                return Ok(());
            }
            for note in related {
                println!("{:>4.0}%  {}  ({})", note.similarity * 100.0, note.title, note.id);
            }
        }
    }
    Ok(())
}
