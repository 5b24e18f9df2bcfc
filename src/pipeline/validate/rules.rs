//! The individual validation rules.
//!
//! Each rule is a pure function over the bill (plus the fee schedule where
//! relevant) returning zero or more findings with an intrinsic confidence.

use std::collections::HashSet;

use crate::models::{ParsedBill, ValidationFlag};
use crate::pipeline::normalize::format_usd;
use crate::pricing::PriceTable;

/// Severity vocabulary. Free-form strings on the wire, but rule authors pick
/// from these three.
pub mod severity {
    pub const WARNING: &str = "warning";
    pub const ERROR: &str = "error";
    pub const CRITICAL: &str = "critical";
}

/// Billed amount beyond this multiple of the median price is an outlier.
const OVERCHARGE_THRESHOLD: f64 = 5.0;

/// Phrases that indicate a claim denial. Checked case-insensitively; list
/// order decides which keyword is reported when several match.
const DENIAL_KEYWORDS: &[&str] = &[
    "denied",
    "denial",
    "not covered",
    "not a covered benefit",
    "lack of documentation",
    "out of network",
    "prior authorization required",
    "service not medically necessary",
];

/// Flag documents that look like EOBs but carry no claim id.
pub fn check_missing_claim_id(bill: &ParsedBill) -> Option<ValidationFlag> {
    let text = bill.raw_text.to_lowercase();
    let is_eob = text.contains("eob") || text.contains("explanation of benefits");

    if is_eob && bill.claim_id.is_none() {
        return Some(ValidationFlag::new(
            "missing_claim_id",
            severity::WARNING,
            "This document appears to be an EOB but is missing a Claim ID.",
            0.95,
        ));
    }
    None
}

/// Flag line items billed far above the median price for their code.
///
/// Evaluates per line item: a bill with five overpriced lines yields five
/// findings. Items without a usable code, amount, or reference price are
/// skipped.
pub fn check_outlier_pricing(bill: &ParsedBill, prices: &PriceTable) -> Vec<ValidationFlag> {
    let mut flags = Vec::new();

    for item in &bill.line_items {
        let (Some(code), Some(billed)) = (item.cpt_code.as_deref(), item.billed_amount) else {
            continue;
        };
        let Some(median) = prices.price_for(code) else {
            continue;
        };
        if median <= 0.0 {
            continue;
        }

        if billed > median * OVERCHARGE_THRESHOLD {
            let times_median = billed / median;
            flags.push(ValidationFlag::new(
                "outlier_pricing_line_item",
                severity::WARNING,
                format!(
                    "Line item for CPT {code} billed at ${} is ~{times_median:.1}x the median price of ${}.",
                    format_usd(billed),
                    format_usd(median),
                ),
                0.90,
            ));
        }
    }

    flags
}

/// Scan the raw text for denial phrasing.
///
/// At most one finding per bill: multiple keywords matching the same denial
/// event would only flood the output.
pub fn check_denial_reasons(bill: &ParsedBill) -> Vec<ValidationFlag> {
    let text = bill.raw_text.to_lowercase();

    DENIAL_KEYWORDS
        .iter()
        .find(|keyword| text.contains(*keyword))
        .map(|keyword| {
            vec![ValidationFlag::new(
                "denial_reason_found",
                severity::CRITICAL,
                format!("Potential denial detected. Found keyword: '{keyword}'."),
                0.98,
            )]
        })
        .unwrap_or_default()
}

/// Flag repeated (code, billed amount) pairs.
///
/// Single linear pass: the first occurrence of a pair is never flagged, only
/// the second and subsequent ones.
pub fn check_duplicates(bill: &ParsedBill) -> Vec<ValidationFlag> {
    let mut flags = Vec::new();
    let mut seen: HashSet<(&str, u64)> = HashSet::new();

    if bill.line_items.len() < 2 {
        return flags;
    }

    for item in &bill.line_items {
        let (Some(code), Some(billed)) = (item.cpt_code.as_deref(), item.billed_amount) else {
            continue;
        };

        if !seen.insert((code, billed.to_bits())) {
            flags.push(ValidationFlag::new(
                "duplicate_line_item",
                severity::ERROR,
                format!(
                    "Duplicate line item found: CPT {code} for ${}.",
                    format_usd(billed)
                ),
                1.0,
            ));
        }
    }

    flags
}

/// Flag line-item codes absent from the fee schedule's vocabulary.
///
/// Skipped entirely when the schedule is unavailable: "invalid" is
/// meaningless without a reference vocabulary.
pub fn check_invalid_cpt_codes(bill: &ParsedBill, prices: &PriceTable) -> Vec<ValidationFlag> {
    if prices.is_empty() {
        return Vec::new();
    }

    bill.line_items
        .iter()
        .filter_map(|item| item.cpt_code.as_deref())
        .filter(|code| !prices.contains(code))
        .map(|code| {
            ValidationFlag::new(
                "invalid_cpt_code",
                severity::ERROR,
                format!("Invalid or non-billable CPT code found: {code}."),
                1.0,
            )
        })
        .collect()
}
