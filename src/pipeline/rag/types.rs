use serde::{Deserialize, Serialize};

use super::RagError;

/// How many passages a retrieval returns at most.
pub const DEFAULT_TOP_K: usize = 2;

/// One passage of authoritative content from the knowledge base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidencePassage {
    pub content: String,
    /// Short label identifying where the passage came from.
    pub source: String,
}

/// A passage with its normalized relevance score (0 to 1, higher is better).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredEvidence {
    pub passage: EvidencePassage,
    pub score: f64,
}

/// Vector-similarity retrieval backend, query text in, scored passages out.
///
/// Implementations must return at most `top_k` results ordered by descending
/// relevance, with scores normalized to [0, 1].
pub trait EvidenceSearch: Send + Sync {
    fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<ScoredEvidence>, RagError>;
}
