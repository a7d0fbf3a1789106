mod app;
mod commands;
mod render;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use uuid::Uuid;

use mnemo_lib::flashcards::ReviewQuality;
use mnemo_lib::notes::NoteKind;

#[derive(Parser)]
#[command(name = "mnemo-cli", about = "Spaced repetition cards and concept-linked notes", version)]
struct Cli {
    /// Data directory (default: $MNEMO_DATA_DIR or the platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Flashcards and reviews
    #[command(subcommand)]
    Card(CardCommand),

    /// Note capture and processing
    #[command(subcommand)]
    Note(NoteCommand),

    /// Concept graph queries
    #[command(subcommand)]
    Concept(ConceptCommand),

    /// Suggest associations for one or more seed concepts
    Insights {
        /// Seed concepts
        #[arg(required = true)]
        seeds: Vec<String>,
        /// Maximum number of insights
        #[arg(long)]
        top: Option<usize>,
    },
}

#[derive(Subcommand)]
enum CardCommand {
    /// Create a new card
    Add {
        front: String,
        back: String,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
    },

    /// List cards due now
    Due,

    /// Record a review outcome
    Review {
        id: Uuid,
        /// again, hard, good or easy (or 0-3)
        quality: ReviewQuality,
    },

    /// Search card text, optionally filtered by tags
    Search {
        #[arg(default_value = "")]
        query: String,
        /// Comma-separated tags (any match)
        #[arg(long)]
        tags: Option<String>,
    },

    /// Show statistics for one card, or for all cards
    Stats { id: Option<Uuid> },

    /// Export all cards to a JSON file
    Export { path: PathBuf },

    /// Import cards from a JSON file
    Import { path: PathBuf },
}

#[derive(Subcommand)]
enum NoteCommand {
    /// Capture a new note
    Add {
        title: String,
        /// Content text (use "-" to read from stdin)
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        kind: Option<NoteKind>,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        author: Option<String>,
    },

    /// Extract concepts from a note and link them into the graph
    Process { id: Uuid },

    /// List notes
    List {
        /// Show only unprocessed notes
        #[arg(long)]
        unprocessed: bool,
    },

    /// Search note titles, summaries and content
    Search { query: String },

    /// Notes sharing concepts with the given one
    Related { id: Uuid },
}

#[derive(Subcommand)]
enum ConceptCommand {
    /// Concepts co-occurring with the given one
    Neighbors {
        concept: String,
        #[arg(long, default_value = "1")]
        min_weight: u64,
    },

    /// Graph size and most frequent concepts
    Stats,
}

/// Split a comma-separated tag list
fn parse_tags(tags: Option<&str>) -> Vec<String> {
    tags.map(|t| {
        t.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

/// Read content from stdin if piped, or resolve "-" as stdin
fn resolve_content(content: Option<String>) -> Option<String> {
    match content.as_deref() {
        Some("-") => {
            let mut buf = String::new();
            std::io::Read::read_to_string(&mut std::io::stdin(), &mut buf).ok();
            Some(buf)
        }
        Some(_) => content,
        None => {
            // Auto-detect piped stdin
            if !std::io::stdin().is_terminal() {
                let mut buf = String::new();
                std::io::Read::read_to_string(&mut std::io::stdin(), &mut buf).ok();
                if buf.is_empty() { None } else { Some(buf) }
            } else {
                None
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && std::io::stdout().is_terminal();
    let mut app = app::App::new(cli.data_dir.as_deref())?;

    match cli.command {
        Command::Card(subcmd) => match subcmd {
            CardCommand::Add { front, back, tags } => {
                commands::card::run_add(&mut app, &front, &back, parse_tags(tags.as_deref()), &cli.format)?;
            }
            CardCommand::Due => {
                commands::card::run_due(&app, &cli.format, use_color)?;
            }
            CardCommand::Review { id, quality } => {
                commands::card::run_review(&mut app, id, quality, &cli.format, use_color)?;
            }
            CardCommand::Search { query, tags } => {
                commands::card::run_search(&app, &query, &parse_tags(tags.as_deref()), &cli.format)?;
            }
            CardCommand::Stats { id } => {
                commands::card::run_stats(&app, id, &cli.format)?;
            }
            CardCommand::Export { path } => {
                commands::card::run_export(&app, &path)?;
            }
            CardCommand::Import { path } => {
                commands::card::run_import(&mut app, &path)?;
            }
        },
        Command::Note(subcmd) => match subcmd {
            NoteCommand::Add { title, content, kind, tags, url, author } => {
                let content = resolve_content(content).unwrap_or_default();
                commands::note::run_add(
                    &app,
                    title,
                    content,
                    kind,
                    parse_tags(tags.as_deref()),
                    url,
                    author,
                    &cli.format,
                )?;
            }
            NoteCommand::Process { id } => {
                commands::note::run_process(&mut app, id, &cli.format, use_color)?;
            }
            NoteCommand::List { unprocessed } => {
                commands::note::run_list(&app, unprocessed, &cli.format, use_color)?;
            }
            NoteCommand::Search { query } => {
                commands::note::run_search(&app, &query, &cli.format)?;
            }
            NoteCommand::Related { id } => {
                commands::note::run_related(&app, id, &cli.format)?;
            }
        },
        Command::Concept(subcmd) => match subcmd {
            ConceptCommand::Neighbors { concept, min_weight } => {
                commands::concept::run_neighbors(&app, &concept, min_weight, &cli.format)?;
            }
            ConceptCommand::Stats => {
                commands::concept::run_stats(&app, &cli.format)?;
            }
        },
        Command::Insights { seeds, top } => {
            commands::concept::run_insights(&app, &seeds, top, &cli.format, use_color)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review_quality(arg: &str) -> Option<ReviewQuality> {
        let id = Uuid::new_v4().to_string();
        match Cli::try_parse_from(["mnemo-cli", "card", "review", id.as_str(), arg]).ok()?.command {
            Command::Card(CardCommand::Review { quality, .. }) => Some(quality),
            _ => None,
        }
    }

    #[test]
    fn test_review_quality_accepts_names_and_ordinals() {
        assert_eq!(review_quality("easy"), Some(ReviewQuality::Easy));
        assert_eq!(review_quality("Hard"), Some(ReviewQuality::Hard));
        assert_eq!(review_quality("2"), Some(ReviewQuality::Good));
        assert_eq!(review_quality("perfect"), None);
    }
}
