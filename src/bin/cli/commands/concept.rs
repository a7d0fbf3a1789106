use std::collections::BTreeSet;

use anyhow::Result;

use mnemo_lib::concepts::InsightGenerator;

use crate::app::App;
use crate::render::terminal::{paint, Color};
use crate::OutputFormat;

pub fn run_neighbors(app: &App, concept: &str, min_weight: u64, format: &OutputFormat) -> Result<()> {
    let concept = concept.trim().to_lowercase();
    let neighbors = app.graph.neighbors(&concept, min_weight);

    match format {
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = neighbors
                .iter()
                .map(|(name, weight)| serde_json::json!({ "concept": name, "weight": weight }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if !app.graph.contains(&concept) {
                println!("Unknown concept '{}'.", concept);
                return Ok(());
            }
            if neighbors.is_empty() {
                println!("'{}' has no neighbors yet.", concept);
                return Ok(());
            }
            for (name, weight) in neighbors {
                println!("{:>4}  {}", weight, name);
            }
        }
    }
    Ok(())
}

pub fn run_stats(app: &App, format: &OutputFormat) -> Result<()> {
    let stats = app.graph.stats();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        OutputFormat::Plain => {
            println!("Concepts: {}", stats.node_count);
            println!("Links:    {}", stats.edge_count);
            if !stats.top_concepts.is_empty() {
                println!("Most frequent:");
                for (concept, frequency) in stats.top_concepts {
                    println!("  {:>4}  {}", frequency, concept);
                }
            }
        }
    }
    Ok(())
}

pub fn run_insights(
    app: &App,
    seeds: &[String],
    top: Option<usize>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let seeds: BTreeSet<String> = seeds.iter().cloned().collect();
    let top_k = top.unwrap_or(app.settings.insights.default_top_k);
    let insights = InsightGenerator::new(&app.graph, &app.settings.insights).generate(&seeds, top_k);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&insights)?),
        OutputFormat::Plain => {
            if insights.is_empty() {
                println!("No insights yet. Process some notes first.");
                return Ok(());
            }
            for insight in insights {
                println!(
                    "{:>6.2}  {} <-> {}",
                    insight.strength,
                    insight.concept_a,
                    paint(&insight.concept_b, Color::BOLD, use_color)
                );
                println!("        {}", insight.rationale);
            }
        }
    }
    Ok(())
}
