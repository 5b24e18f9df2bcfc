//! Bill assembly: extractor output → one `ParsedBill`.
//!
//! Assembly is where the fallback and cleanup heuristics live. They are kept
//! as explicit, ordered data (`CLEANUP_PREDICATES`) rather than inline
//! conditionals so each one can be unit-tested and carries its rationale.

use thiserror::Error;
use uuid::Uuid;

use crate::models::ParsedBill;
use crate::pipeline::extract::{
    extract_fields, extract_line_items, scan_cpt_codes, scan_icd_codes,
};
use crate::pipeline::normalize::{clean_amount, parse_date};

#[derive(Debug, Error)]
pub enum AssembleError {
    /// The one hard precondition of the core: raw text must be non-empty.
    /// The text-extraction collaborator is responsible for never passing
    /// an empty document this far.
    #[error("Document produced no text")]
    EmptyText,
}

/// A post-extraction cleanup predicate for name-like fields.
///
/// When `disqualifies` returns true the extracted value is discarded as a
/// false positive.
pub struct CleanupPredicate {
    pub name: &'static str,
    pub rationale: &'static str,
    disqualifies: fn(&str) -> bool,
}

/// Ordered cleanup predicates applied to provider and patient name after the
/// raw pattern pass.
pub static CLEANUP_PREDICATES: &[CleanupPredicate] = &[CleanupPredicate {
    // "Explanation of Benefits" boilerplate sits next to the same labels the
    // name patterns key on, so a capture containing "benefits" is almost
    // always the document title, not a name.
    name: "eob_boilerplate_marker",
    rationale: "captures containing 'benefits' are EOB boilerplate, not names",
    disqualifies: |value| value.contains("benefits"),
}];

/// Null out a name-like field when any cleanup predicate disqualifies it.
pub fn scrub_name_field(value: Option<String>) -> Option<String> {
    value.filter(|v| {
        !CLEANUP_PREDICATES
            .iter()
            .any(|p| (p.disqualifies)(v))
    })
}

/// Parse one block of raw text into a `ParsedBill`.
///
/// Never fails on malformed or partial content; every field degrades to
/// absent. Only empty input is an error.
pub fn assemble_bill(text: &str) -> Result<ParsedBill, AssembleError> {
    if text.trim().is_empty() {
        return Err(AssembleError::EmptyText);
    }

    let fields = extract_fields(text);
    let line_items = extract_line_items(text);

    let provider = scrub_name_field(fields.provider);
    let patient_name = scrub_name_field(fields.patient_name);

    // Total precedence: dedicated total-charges match, then amount-due.
    // A resolved total of exactly zero is treated as a failed extraction and
    // replaced by the patient-responsibility candidate, since many EOBs report
    // only per-line responsibility, and true zero-dollar bills are rare.
    // Known ambiguity: this conflates "true zero bill" with "missed field".
    let labeled_total = clean_amount(fields.total_billed.as_deref())
        .or_else(|| clean_amount(fields.amount_due.as_deref()));
    let total_billed = match labeled_total {
        Some(total) if total != 0.0 => Some(total),
        _ => clean_amount(fields.patient_responsibility.as_deref()),
    };

    Ok(ParsedBill {
        session_id: Uuid::new_v4(),
        provider,
        patient_name,
        claim_id: fields.claim_id,
        date_of_service: parse_date(fields.date_of_service.as_deref()),
        total_billed,
        line_items,
        cpt_codes: scan_cpt_codes(text),
        icd_codes: scan_icd_codes(text),
        raw_text: text.to_string(),
    })
}
