//! Insight generation over the concept graph.
//!
//! Each candidate pairs a seed concept with one of its neighbors outside the
//! seed set. Candidates are scored by `weight * ln(1 + frequency(neighbor))`,
//! a heuristic favouring strong links to concepts seen often.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::graph::KnowledgeGraph;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InsightConfig {
    pub default_top_k: usize,
    /// Edges lighter than this are ignored
    pub min_weight: u64,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            default_top_k: 5,
            min_weight: 1,
        }
    }
}

/// A ranked association between a seed concept and a neighbor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub concept_a: String,
    pub concept_b: String,
    pub strength: f64,
    pub co_occurrence_count: u64,
    pub rationale: String,
}

pub struct InsightGenerator<'a> {
    graph: &'a KnowledgeGraph,
    min_weight: u64,
}

impl<'a> InsightGenerator<'a> {
    pub fn new(graph: &'a KnowledgeGraph, config: &InsightConfig) -> Self {
        Self {
            graph,
            min_weight: config.min_weight.max(1),
        }
    }

    /// Top `top_k` insights for the given seeds. Empty when no seed has edges.
    pub fn generate(&self, seeds: &BTreeSet<String>, top_k: usize) -> Vec<Insight> {
        let seeds: BTreeSet<String> = seeds
            .iter()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        let mut candidates: Vec<Insight> = Vec::new();
        for seed in &seeds {
            for (neighbor, weight) in self.graph.neighbors(seed, self.min_weight) {
                if seeds.contains(&neighbor) {
                    continue;
                }
                let frequency = self.graph.frequency(&neighbor);
                let strength = weight as f64 * (frequency as f64).ln_1p();
                candidates.push(Insight {
                    rationale: rationale(seed, &neighbor, weight),
                    concept_a: seed.clone(),
                    concept_b: neighbor,
                    strength,
                    co_occurrence_count: weight,
                });
            }
        }

        candidates.sort_by(|a, b| {
            b.strength
                .total_cmp(&a.strength)
                .then_with(|| a.concept_b.cmp(&b.concept_b))
                .then_with(|| a.concept_a.cmp(&b.concept_a))
        });
        candidates.truncate(top_k);

        log::debug!("Generated {} insights from {} seeds", candidates.len(), seeds.len());
        candidates
    }
}

fn rationale(seed: &str, neighbor: &str, count: u64) -> String {
    let times = if count == 1 { "item" } else { "items" };
    format!(
        "'{}' and '{}' appeared together in {} processed {}",
        seed, neighbor, count, times
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(words: &[&str]) -> BTreeSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn sample_graph() -> KnowledgeGraph {
        let mut kg = KnowledgeGraph::new();
        kg.add_content("c1", &set(&["memory", "sleep"]));
        kg.add_content("c2", &set(&["memory", "dream"]));
        kg
    }

    #[test]
    fn test_tie_prefers_lexically_first() {
        let kg = sample_graph();
        let insights = InsightGenerator::new(&kg, &InsightConfig::default()).generate(&set(&["memory"]), 1);

        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].concept_a, "memory");
        assert_eq!(insights[0].concept_b, "dream");
        assert_eq!(insights[0].co_occurrence_count, 1);
        assert!(insights[0].rationale.contains("dream"));
        assert!(insights[0].rationale.contains("1 processed item"));
    }

    #[test]
    fn test_frequency_breaks_equal_weights() {
        let mut kg = sample_graph();
        kg.add_content("c3", &set(&["sleep", "rest"]));

        let insights = InsightGenerator::new(&kg, &InsightConfig::default()).generate(&set(&["memory"]), 5);

        assert_eq!(insights.len(), 2);
        assert_eq!(insights[0].concept_b, "sleep");
        assert!(insights[0].strength > insights[1].strength);
    }

    #[test]
    fn test_seeds_are_excluded() {
        let kg = sample_graph();
        let insights =
            InsightGenerator::new(&kg, &InsightConfig::default()).generate(&set(&["memory", "sleep"]), 10);

        assert!(insights.iter().all(|i| i.concept_b != "memory" && i.concept_b != "sleep"));
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].concept_b, "dream");
    }

    #[test]
    fn test_no_edges_gives_empty() {
        let mut kg = KnowledgeGraph::new();
        kg.add_content("c1", &set(&["lonely"]));
        let generator = InsightGenerator::new(&kg, &InsightConfig::default());

        assert!(generator.generate(&set(&["lonely"]), 3).is_empty());
        assert!(generator.generate(&set(&["missing"]), 3).is_empty());
        assert!(generator.generate(&BTreeSet::new(), 3).is_empty());
    }

    #[test]
    fn test_min_weight_filters() {
        let mut kg = sample_graph();
        kg.add_content("c3", &set(&["memory", "sleep"]));
        let config = InsightConfig {
            min_weight: 2,
            ..Default::default()
        };

        let insights = InsightGenerator::new(&kg, &config).generate(&set(&["Memory"]), 5);
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].concept_b, "sleep");
        assert_eq!(insights[0].co_occurrence_count, 2);
    }
}
