//! Formatting retrieved evidence into the prompt's context block.

use super::types::ScoredEvidence;
use crate::models::Citation;

/// Fixed fallback when retrieval produced nothing.
pub const NO_CONTEXT_FALLBACK: &str = "No relevant context found in the knowledge base.";

/// Render the retrieved passages as an authoritative-context block, one
/// section per passage with its relevance score to two decimals.
pub fn format_evidence_block(evidence: &[ScoredEvidence]) -> String {
    if evidence.is_empty() {
        return NO_CONTEXT_FALLBACK.to_string();
    }

    evidence
        .iter()
        .map(|e| {
            format!(
                "Source Content (Relevance Score: {:.2}):\n{}",
                e.score, e.passage.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Turn retrieved evidence into response citations.
pub fn citations_from_evidence(evidence: &[ScoredEvidence]) -> Vec<Citation> {
    evidence
        .iter()
        .map(|e| Citation {
            source: e.passage.source.clone(),
            content: e.passage.content.clone(),
        })
        .collect()
}
