//! Pipeline orchestrator.
//!
//! Single entry points that drive the synchronous core: raw text → parsed
//! bill → validation findings, and the two evidence-grounded flows
//! (explanation, appeal draft) layered on top. The core has no suspension
//! points of its own; callers on async runtimes wrap these in a blocking
//! task.

use thiserror::Error;

use crate::models::{
    AppealDraftResponse, Citation, ExplanationResponse, ValidationFlag, ValidationReport,
};
use crate::pipeline::assemble::{assemble_bill, AssembleError};
use crate::pipeline::llm::{LlmError, LlmGenerate};
use crate::pipeline::rag::context::{citations_from_evidence, format_evidence_block};
use crate::pipeline::rag::prompt;
use crate::pipeline::rag::retrieval::retrieve_for_flags;
use crate::pipeline::rag::types::EvidenceSearch;
use crate::pipeline::validate::confidence::apply_retrieval_scores;
use crate::pipeline::validate::run_validations;
use crate::pricing::PriceTable;

#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error(transparent)]
    Assemble(#[from] AssembleError),

    #[error("Failed to serialize bill data: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Llm(#[from] LlmError),
}

/// Parse one block of raw text and run the validation battery against it.
pub fn process_text(text: &str, prices: &PriceTable) -> Result<ValidationReport, ProcessingError> {
    let bill = assemble_bill(text)?;
    let flags = run_validations(&bill, prices);

    tracing::info!(
        session_id = %bill.session_id,
        line_items = bill.line_items.len(),
        flags = flags.len(),
        "Bill processed"
    );

    Ok(ValidationReport {
        parsed_data: bill,
        flags,
    })
}

/// Retrieve evidence for a report's flags and blend it into their
/// confidence scores. Returns the scored flags, the citations, and the
/// rendered evidence block.
fn ground_flags(
    report: &ValidationReport,
    evidence_backend: &dyn EvidenceSearch,
) -> (Vec<ValidationFlag>, Vec<Citation>, String) {
    let evidence = retrieve_for_flags(evidence_backend, &report.flags);
    let scored = apply_retrieval_scores(report.flags.clone(), &evidence);
    let citations = citations_from_evidence(&evidence);
    let context = format_evidence_block(&evidence);
    (scored, citations, context)
}

fn scored_report_json(
    report: &ValidationReport,
    scored_flags: &[ValidationFlag],
) -> Result<String, ProcessingError> {
    let enriched = ValidationReport {
        parsed_data: report.parsed_data.clone(),
        flags: scored_flags.to_vec(),
    };
    Ok(serde_json::to_string_pretty(&enriched)?)
}

/// Explain a validated bill: retrieve evidence, score the flags, and ask the
/// model for a cited explanation.
pub fn explain_report(
    report: &ValidationReport,
    evidence_backend: &dyn EvidenceSearch,
    llm: &dyn LlmGenerate,
) -> Result<ExplanationResponse, ProcessingError> {
    let (scored_flags, citations, context) = ground_flags(report, evidence_backend);
    let validation_json = scored_report_json(report, &scored_flags)?;

    let explanation =
        llm.generate(prompt::SYSTEM_PROMPT, &prompt::build_explanation_prompt(&validation_json, &context))?;

    Ok(ExplanationResponse {
        explanation_text: explanation,
        citations,
        flags: scored_flags,
    })
}

/// Draft an appeal letter for a validated bill, grounded in retrieved
/// evidence.
pub fn draft_appeal(
    report: &ValidationReport,
    evidence_backend: &dyn EvidenceSearch,
    llm: &dyn LlmGenerate,
) -> Result<AppealDraftResponse, ProcessingError> {
    let (scored_flags, citations, context) = ground_flags(report, evidence_backend);
    let validation_json = scored_report_json(report, &scored_flags)?;

    let letter =
        llm.generate(prompt::SYSTEM_PROMPT, &prompt::build_appeal_prompt(&validation_json, &context))?;

    Ok(AppealDraftResponse {
        appeal_draft_text: letter,
        citations,
        flags: scored_flags,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::rag::retrieval::{NoEvidence, StaticEvidenceSearch};
    use std::sync::Mutex;

    /// Records the prompts it was called with and replies with canned text.
    struct RecordingLlm {
        calls: Mutex<Vec<(String, String)>>,
        reply: &'static str,
    }

    impl RecordingLlm {
        fn new(reply: &'static str) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                reply,
            }
        }
    }

    impl LlmGenerate for RecordingLlm {
        fn generate(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
            self.calls
                .lock()
                .unwrap()
                .push((system.to_string(), prompt.to_string()));
            Ok(self.reply.to_string())
        }
    }

    const EOB_TEXT: &str = "\
EOB
06/15/24  Office visit  600.00  allowed  100.00
";

    fn prices() -> PriceTable {
        PriceTable::from_pairs([("99213", 100.0)])
    }

    #[test]
    fn process_text_parses_and_validates() {
        let report = process_text(EOB_TEXT, &prices()).unwrap();
        assert_eq!(report.parsed_data.line_items.len(), 1);
        assert!(report
            .flags
            .iter()
            .any(|f| f.flag_id == "missing_claim_id"));
        // Flags are unscored until an evidence flow runs.
        assert!(report.flags.iter().all(|f| f.final_confidence.is_none()));
    }

    #[test]
    fn empty_text_fails_immediately() {
        let err = process_text("  ", &prices()).unwrap_err();
        assert!(matches!(err, ProcessingError::Assemble(_)));
    }

    #[test]
    fn explanation_flow_scores_flags_and_cites_evidence() {
        let report = process_text(EOB_TEXT, &prices()).unwrap();

        let mut backend = StaticEvidenceSearch::new();
        backend.add("Source ID: CMS-EOB-001 Title: Claim identifiers", 0.5);
        let llm = RecordingLlm::new("Here is what the findings mean.");

        let response = explain_report(&report, &backend, &llm).unwrap();
        assert_eq!(response.explanation_text, "Here is what the findings mean.");
        assert_eq!(response.citations.len(), 1);
        assert_eq!(response.citations[0].source, "CMS-EOB-001");
        for flag in &response.flags {
            assert_eq!(flag.retrieval_score, Some(0.5));
            assert!(flag.final_confidence.is_some());
        }
    }

    #[test]
    fn explanation_prompt_carries_scored_flags_and_context() {
        let report = process_text(EOB_TEXT, &prices()).unwrap();

        let mut backend = StaticEvidenceSearch::new();
        backend.add("Source ID: CMS-EOB-001 Title: Claim identifiers", 0.5);
        let llm = RecordingLlm::new("ok");

        explain_report(&report, &backend, &llm).unwrap();

        let calls = llm.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (system, prompt_text) = &calls[0];
        assert_eq!(system, prompt::SYSTEM_PROMPT);
        assert!(prompt_text.contains("missing_claim_id"));
        assert!(prompt_text.contains("final_confidence"));
        assert!(prompt_text.contains("Relevance Score: 0.50"));
    }

    #[test]
    fn appeal_flow_without_evidence_uses_fallback_context() {
        let report = process_text(EOB_TEXT, &prices()).unwrap();
        let llm = RecordingLlm::new("Dear Claims Department,");

        let response = draft_appeal(&report, &NoEvidence, &llm).unwrap();
        assert_eq!(response.appeal_draft_text, "Dear Claims Department,");
        assert!(response.citations.is_empty());
        for flag in &response.flags {
            assert_eq!(flag.retrieval_score, Some(0.0));
        }

        let calls = llm.calls.lock().unwrap();
        assert!(calls[0]
            .1
            .contains("No relevant context found in the knowledge base."));
    }

    #[test]
    fn llm_failure_propagates() {
        struct FailingLlm;
        impl LlmGenerate for FailingLlm {
            fn generate(&self, _system: &str, _prompt: &str) -> Result<String, LlmError> {
                Err(LlmError::Timeout)
            }
        }

        let report = process_text(EOB_TEXT, &prices()).unwrap();
        let err = explain_report(&report, &NoEvidence, &FailingLlm).unwrap_err();
        assert!(matches!(err, ProcessingError::Llm(LlmError::Timeout)));
    }
}
