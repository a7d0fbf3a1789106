//! Concept extraction, the concept co-occurrence graph and insight queries

pub mod extractor;
pub mod graph;
pub mod insights;

pub use extractor::{ConceptExtractor, ExtractorConfig};
pub use graph::{GraphEdge, GraphError, GraphNode, GraphSnapshot, GraphStats, KnowledgeGraph};
pub use insights::{Insight, InsightConfig, InsightGenerator};
