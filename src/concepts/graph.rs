//! Concept co-occurrence graph.
//!
//! Undirected, weighted graph backed by petgraph. Nodes are concepts with a
//! frequency count, edges carry the number of content items in which both
//! endpoints appeared together.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::extractor::ConceptExtractor;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Invalid graph state: {0}")]
    InvalidState(String),
}

pub type Result<T> = std::result::Result<T, GraphError>;

/// A concept node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub concept: String,
    /// Number of processed content items mentioning the concept.
    pub frequency: u64,
    pub first_seen: DateTime<Utc>,
}

/// An undirected edge in snapshot form, `source < target` lexically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub co_occurrence_count: u64,
}

/// Full node/edge set used at the persistence boundary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSnapshot {
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
    #[serde(default)]
    pub edges: Vec<GraphEdge>,
}

/// Summary counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    /// Most frequent concepts, highest first.
    pub top_concepts: Vec<(String, u64)>,
}

/// The in-memory concept graph.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeGraph {
    graph: UnGraph<GraphNode, u64>,
    /// Index for O(1) lookups by concept name.
    index: HashMap<String, NodeIndex>,
}

impl KnowledgeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the graph from a snapshot.
    ///
    /// Rejects duplicate nodes, self-loops, duplicate edges and edges that
    /// reference unknown concepts.
    pub fn from_snapshot(snapshot: GraphSnapshot) -> Result<Self> {
        let mut kg = Self::new();

        for node in snapshot.nodes {
            if kg.index.contains_key(&node.concept) {
                return Err(GraphError::InvalidState(format!(
                    "duplicate concept '{}'",
                    node.concept
                )));
            }
            let concept = node.concept.clone();
            let idx = kg.graph.add_node(node);
            kg.index.insert(concept, idx);
        }

        for edge in snapshot.edges {
            if edge.source == edge.target {
                return Err(GraphError::InvalidState(format!(
                    "self-loop on '{}'",
                    edge.source
                )));
            }
            let a = kg.lookup(&edge.source)?;
            let b = kg.lookup(&edge.target)?;
            if kg.graph.find_edge(a, b).is_some() {
                return Err(GraphError::InvalidState(format!(
                    "duplicate edge '{}' - '{}'",
                    edge.source, edge.target
                )));
            }
            kg.graph.add_edge(a, b, edge.co_occurrence_count);
        }

        log::info!(
            "Loaded knowledge graph: {} concepts, {} edges",
            kg.node_count(),
            kg.edge_count()
        );
        Ok(kg)
    }

    fn lookup(&self, concept: &str) -> Result<NodeIndex> {
        self.index
            .get(concept)
            .copied()
            .ok_or_else(|| GraphError::InvalidState(format!("edge references unknown concept '{}'", concept)))
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        let nodes = self.graph.node_weights().cloned().collect();
        let edges = self
            .graph
            .edge_references()
            .map(|e| {
                let a = &self.graph[e.source()].concept;
                let b = &self.graph[e.target()].concept;
                let (source, target) = if a <= b { (a, b) } else { (b, a) };
                GraphEdge {
                    source: source.clone(),
                    target: target.clone(),
                    co_occurrence_count: *e.weight(),
                }
            })
            .collect();

        GraphSnapshot { nodes, edges }
    }

    /// Record one processed content item.
    ///
    /// Purely additive: feeding the same content twice counts it twice.
    pub fn add_content(&mut self, content_id: &str, concepts: &BTreeSet<String>) {
        self.add_content_at(content_id, concepts, Utc::now());
    }

    pub fn add_content_at(&mut self, content_id: &str, concepts: &BTreeSet<String>, now: DateTime<Utc>) {
        let nodes: Vec<NodeIndex> = concepts
            .iter()
            .filter(|c| !c.is_empty())
            .map(|c| self.touch_node(c, now))
            .collect();

        for (i, &a) in nodes.iter().enumerate() {
            for &b in &nodes[i + 1..] {
                match self.graph.find_edge(a, b) {
                    Some(e) => self.graph[e] += 1,
                    None => {
                        self.graph.add_edge(a, b, 1);
                    }
                }
            }
        }

        log::debug!("Added content {} with {} concepts", content_id, nodes.len());
    }

    fn touch_node(&mut self, concept: &str, now: DateTime<Utc>) -> NodeIndex {
        if let Some(&idx) = self.index.get(concept) {
            self.graph[idx].frequency += 1;
            return idx;
        }

        let idx = self.graph.add_node(GraphNode {
            concept: concept.to_string(),
            frequency: 1,
            first_seen: now,
        });
        self.index.insert(concept.to_string(), idx);
        idx
    }

    /// Extract concepts from `text` and record them as one content item.
    pub fn ingest(&mut self, extractor: &ConceptExtractor, content_id: &str, text: &str) -> BTreeSet<String> {
        let concepts = extractor.extract(text);
        self.add_content(content_id, &concepts);
        log::info!("Ingested content {}: {} concepts", content_id, concepts.len());
        concepts
    }

    /// Neighbors with weight at least `min_weight`, heaviest first, ties by
    /// concept name.
    pub fn neighbors(&self, concept: &str, min_weight: u64) -> Vec<(String, u64)> {
        let Some(&idx) = self.index.get(concept) else {
            return Vec::new();
        };

        let mut out: Vec<(String, u64)> = self
            .graph
            .edges(idx)
            .filter(|e| *e.weight() >= min_weight)
            .map(|e| {
                let other = if e.source() == idx { e.target() } else { e.source() };
                (self.graph[other].concept.clone(), *e.weight())
            })
            .collect();

        out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        out
    }

    pub fn node(&self, concept: &str) -> Option<&GraphNode> {
        self.index.get(concept).map(|&idx| &self.graph[idx])
    }

    /// 0 for unknown concepts.
    pub fn frequency(&self, concept: &str) -> u64 {
        self.node(concept).map_or(0, |n| n.frequency)
    }

    /// 0 when the concepts never co-occurred.
    pub fn edge_weight(&self, a: &str, b: &str) -> u64 {
        match (self.index.get(a), self.index.get(b)) {
            (Some(&a), Some(&b)) => self
                .graph
                .find_edge(a, b)
                .map_or(0, |e| self.graph[e]),
            _ => 0,
        }
    }

    pub fn contains(&self, concept: &str) -> bool {
        self.index.contains_key(concept)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn stats(&self) -> GraphStats {
        let mut top: Vec<(String, u64)> = self
            .graph
            .node_weights()
            .map(|n| (n.concept.clone(), n.frequency))
            .collect();
        top.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        top.truncate(5);

        GraphStats {
            node_count: self.node_count(),
            edge_count: self.edge_count(),
            top_concepts: top,
        }
    }
}
