//! Query construction and retrieval plumbing around the evidence backend.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{EvidencePassage, EvidenceSearch, ScoredEvidence, DEFAULT_TOP_K};
use super::RagError;
use crate::models::ValidationFlag;

/// Knowledge-base passages embed their provenance inline; this pulls the
/// source label out of the passage body.
static SOURCE_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)Source ID:(.*?)Title:").expect("invalid source id pattern")
});

/// Build one retrieval query for a batch of findings: all finding messages
/// joined by spaces. Retrieval is not re-run per finding.
pub fn flag_query(flags: &[ValidationFlag]) -> String {
    flags
        .iter()
        .map(|f| f.message.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extract the source label embedded in a passage body, whitespace removed.
/// Falls back to "Unknown" when the passage carries no provenance block.
pub fn extract_source_id(content: &str) -> String {
    SOURCE_ID
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().split_whitespace().collect::<String>())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Normalize an L2 distance (lower is better) into a similarity in (0, 1]
/// (higher is better).
pub fn similarity_from_distance(distance: f64) -> f64 {
    1.0 / (1.0 + distance)
}

/// Retrieve evidence for a batch of findings, degrading to no evidence on
/// backend failure. Retrieval never blocks validation output.
pub fn retrieve_for_flags(
    backend: &dyn EvidenceSearch,
    flags: &[ValidationFlag],
) -> Vec<ScoredEvidence> {
    if flags.is_empty() {
        return Vec::new();
    }

    let query = flag_query(flags);
    match backend.retrieve(&query, DEFAULT_TOP_K) {
        Ok(evidence) => evidence,
        Err(e) => {
            tracing::warn!(error = %e, "Evidence retrieval failed, continuing without evidence");
            Vec::new()
        }
    }
}

/// Backend used when no vector store is wired up: retrieval yields nothing
/// and every finding keeps a zero retrieval component.
pub struct NoEvidence;

impl EvidenceSearch for NoEvidence {
    fn retrieve(&self, _query: &str, _top_k: usize) -> Result<Vec<ScoredEvidence>, RagError> {
        Ok(Vec::new())
    }
}

/// In-memory backend over seeded passages. Used in tests and demos; ranking
/// is by the stored score, mimicking a pre-scored similarity search.
pub struct StaticEvidenceSearch {
    entries: Vec<ScoredEvidence>,
}

impl StaticEvidenceSearch {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Seed one passage. The source label is parsed from the content body.
    pub fn add(&mut self, content: &str, score: f64) {
        self.entries.push(ScoredEvidence {
            passage: EvidencePassage {
                content: content.to_string(),
                source: extract_source_id(content),
            },
            score,
        });
    }
}

impl Default for StaticEvidenceSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl EvidenceSearch for StaticEvidenceSearch {
    fn retrieve(&self, _query: &str, top_k: usize) -> Result<Vec<ScoredEvidence>, RagError> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(top_k);
        Ok(ranked)
    }
}
