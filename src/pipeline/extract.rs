//! Field extraction over one block of raw bill text.
//!
//! Three independent passes, all deliberately permissive: every extracted
//! value is advisory input to downstream rules, never authoritative:
//!
//! 1. labeled-prefix scalar pass driven by the `patterns::FIELD_PATTERNS`
//!    table (provider, patient, claim id, date, amount candidates),
//! 2. a line-oriented pass for EOB-style service lines,
//! 3. whole-document scans for bare CPT-shaped and ICD-shaped tokens.
//!
//! The code scans run across the whole document regardless of line, which is
//! why line items may carry no procedure code even when the bill-level code
//! sets are non-empty.

use std::collections::BTreeSet;

use crate::models::LineItem;
use crate::pipeline::normalize::clean_amount;
use crate::pipeline::patterns::{BillField, CPT_CODE, FIELD_PATTERNS, ICD_CODE, LINE_ITEM};

/// Raw scalar candidates from the labeled-prefix pass. Amount and date
/// fields stay as matched substrings here; normalization happens at
/// assembly.
#[derive(Debug, Default, Clone)]
pub struct ExtractedFields {
    pub provider: Option<String>,
    pub patient_name: Option<String>,
    pub claim_id: Option<String>,
    pub date_of_service: Option<String>,
    pub total_billed: Option<String>,
    pub amount_due: Option<String>,
    pub patient_responsibility: Option<String>,
}

/// Run every pattern rule in the table against the text, first match wins.
pub fn extract_fields(text: &str) -> ExtractedFields {
    let mut fields = ExtractedFields::default();

    for pattern in FIELD_PATTERNS.iter() {
        let value = pattern.first_capture(text);
        if value.is_none() {
            continue;
        }
        let slot = match pattern.field {
            BillField::Provider => &mut fields.provider,
            BillField::PatientName => &mut fields.patient_name,
            BillField::ClaimId => &mut fields.claim_id,
            BillField::DateOfService => &mut fields.date_of_service,
            BillField::TotalBilled => &mut fields.total_billed,
            BillField::AmountDue => &mut fields.amount_due,
            BillField::PatientResponsibility => &mut fields.patient_responsibility,
        };
        if slot.is_none() {
            *slot = value;
        }
    }

    fields
}

/// Line-oriented pass for EOB-style service lines.
///
/// A line shaped `<date> <text> <amount> <text> <amount>` becomes one item:
/// the first amount is the billed charge, the second the per-line patient
/// responsibility. No procedure code is expected from this pass.
pub fn extract_line_items(text: &str) -> Vec<LineItem> {
    LINE_ITEM
        .captures_iter(text)
        .map(|caps| {
            let date = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            let billed = clean_amount(caps.get(2).map(|m| m.as_str()));

            LineItem {
                cpt_code: None,
                description: Some(format!("Service on {date}")),
                billed_amount: billed,
                reference_price: None,
            }
        })
        .collect()
}

/// Collect unique CPT-shaped tokens across the whole document.
pub fn scan_cpt_codes(text: &str) -> BTreeSet<String> {
    CPT_CODE
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Collect unique ICD-shaped tokens across the whole document.
pub fn scan_icd_codes(text: &str) -> BTreeSet<String> {
    ICD_CODE
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect()
}
