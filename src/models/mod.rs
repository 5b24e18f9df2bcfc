//! Value objects shared across the pipeline and the API layer.
//!
//! Everything here is created fresh per request and never mutated after
//! assembly. Absent fields are modeled as `Option`; a missing provider or
//! amount is a normal extraction outcome, never a sentinel zero or empty
//! string.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One billed service line found on a bill or EOB.
///
/// Line items are best-effort: EOB-style statements commonly carry a date and
/// two amounts but no procedure code, so `cpt_code` and `billed_amount` may
/// both be absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub cpt_code: Option<String>,
    pub description: Option<String>,
    pub billed_amount: Option<f64>,
    /// Reference median price for the code, when the fee schedule knows it.
    pub reference_price: Option<f64>,
}

/// The assembled record for one document.
///
/// `raw_text` is always present and non-empty; a document that yields no
/// text is rejected before assembly. Every other field is advisory and may
/// be absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedBill {
    /// Unique id for this processing run.
    pub session_id: Uuid,
    pub provider: Option<String>,
    pub patient_name: Option<String>,
    pub claim_id: Option<String>,
    pub date_of_service: Option<NaiveDate>,
    pub total_billed: Option<f64>,
    pub line_items: Vec<LineItem>,
    /// Unique CPT-shaped tokens found anywhere in the text.
    pub cpt_codes: BTreeSet<String>,
    /// Unique ICD-shaped tokens found anywhere in the text.
    pub icd_codes: BTreeSet<String>,
    /// Full extracted text, retained for rule evaluation and debugging.
    pub raw_text: String,
}

/// One deterministic validation finding.
///
/// `retrieval_score` and `final_confidence` stay `None` until the confidence
/// combiner runs (only the explanation/appeal flows do retrieval).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationFlag {
    /// Stable short name of the rule that produced this flag.
    pub flag_id: String,
    /// Severity vocabulary: "warning", "error", or "critical".
    pub flag_type: String,
    pub message: String,
    /// Intrinsic confidence of the rule, in [0, 1].
    pub rule_confidence: f64,
    /// Best evidence relevance from retrieval, in [0, 1].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retrieval_score: Option<f64>,
    /// Blended rule + retrieval confidence, in [0, 1].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_confidence: Option<f64>,
}

impl ValidationFlag {
    pub fn new(
        flag_id: impl Into<String>,
        flag_type: impl Into<String>,
        message: impl Into<String>,
        rule_confidence: f64,
    ) -> Self {
        Self {
            flag_id: flag_id.into(),
            flag_type: flag_type.into(),
            message: message.into(),
            rule_confidence,
            retrieval_score: None,
            final_confidence: None,
        }
    }
}

/// Response of the validation endpoint: the parsed bill plus its findings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub parsed_data: ParsedBill,
    pub flags: Vec<ValidationFlag>,
}

/// One piece of evidence retrieved from the knowledge base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub source: String,
    pub content: String,
}

/// Explanation of a bill's findings, grounded in retrieved evidence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplanationResponse {
    pub explanation_text: String,
    #[serde(default)]
    pub citations: Vec<Citation>,
    /// The final, scored flags that were analyzed.
    #[serde(default)]
    pub flags: Vec<ValidationFlag>,
}

/// A drafted appeal letter, grounded in retrieved evidence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppealDraftResponse {
    pub appeal_draft_text: String,
    #[serde(default)]
    pub citations: Vec<Citation>,
    /// The final, scored flags that were analyzed.
    #[serde(default)]
    pub flags: Vec<ValidationFlag>,
}
