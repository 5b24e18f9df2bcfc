//! Confidence blending: intrinsic rule confidence × retrieval evidence.
//!
//! Retrieval is run once per batch of findings (the query concatenates all
//! finding messages), so every finding receives the same retrieval-derived
//! component: the best relevance score across the retrieved evidence.

use crate::models::ValidationFlag;
use crate::pipeline::rag::types::ScoredEvidence;

/// The deterministic rule is the primary signal.
pub const RULE_CONFIDENCE_WEIGHT: f64 = 0.6;
/// Evidence quality from retrieval is the secondary signal.
pub const RETRIEVAL_SCORE_WEIGHT: f64 = 0.4;

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Highest relevance score across the retrieved evidence, 0.0 when nothing
/// was retrieved.
pub fn best_relevance(evidence: &[ScoredEvidence]) -> f64 {
    evidence.iter().fold(0.0, |best, e| best.max(e.score))
}

/// Fill in `retrieval_score` and `final_confidence` on every flag.
///
/// `final = rule_confidence * 0.6 + best * 0.4`, both scores rounded to four
/// decimal places.
pub fn apply_retrieval_scores(
    mut flags: Vec<ValidationFlag>,
    evidence: &[ScoredEvidence],
) -> Vec<ValidationFlag> {
    let best = best_relevance(evidence);

    for flag in &mut flags {
        let blended =
            flag.rule_confidence * RULE_CONFIDENCE_WEIGHT + best * RETRIEVAL_SCORE_WEIGHT;
        flag.retrieval_score = Some(round4(best));
        flag.final_confidence = Some(round4(blended));
    }

    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::rag::types::EvidencePassage;

    fn evidence(score: f64) -> ScoredEvidence {
        ScoredEvidence {
            passage: EvidencePassage {
                content: "guideline text".into(),
                source: "CMS-001".into(),
            },
            score,
        }
    }

    fn flag(rule_confidence: f64) -> ValidationFlag {
        ValidationFlag::new("duplicate_line_item", "error", "dup", rule_confidence)
    }

    #[test]
    fn blends_rule_and_best_retrieval_score() {
        let flags = apply_retrieval_scores(vec![flag(0.90)], &[evidence(0.50)]);
        assert_eq!(flags[0].final_confidence, Some(0.74));
        assert_eq!(flags[0].retrieval_score, Some(0.50));
    }

    #[test]
    fn best_evidence_broadcasts_to_every_flag() {
        let flags = apply_retrieval_scores(
            vec![flag(1.0), flag(0.5)],
            &[evidence(0.2), evidence(0.8), evidence(0.4)],
        );
        assert_eq!(flags[0].retrieval_score, Some(0.8));
        assert_eq!(flags[1].retrieval_score, Some(0.8));
        assert_eq!(flags[0].final_confidence, Some(0.92));
        assert_eq!(flags[1].final_confidence, Some(0.62));
    }

    #[test]
    fn no_evidence_means_zero_retrieval_component() {
        let flags = apply_retrieval_scores(vec![flag(0.95)], &[]);
        assert_eq!(flags[0].retrieval_score, Some(0.0));
        assert_eq!(flags[0].final_confidence, Some(0.57));
    }

    #[test]
    fn scores_are_rounded_to_four_decimals() {
        let flags = apply_retrieval_scores(vec![flag(0.98)], &[evidence(0.123456)]);
        assert_eq!(flags[0].retrieval_score, Some(0.1235));
        assert_eq!(flags[0].final_confidence, Some(0.6374));
    }
}
