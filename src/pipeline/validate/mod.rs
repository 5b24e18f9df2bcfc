//! Deterministic validation battery.
//!
//! A fixed, ordered set of independent rules over the assembled bill and the
//! reference fee schedule. Rules never read each other's output; the
//! orchestrator's only job is to run all of them and concatenate findings.
//! The order is fixed purely so output ordering is deterministic.

pub mod confidence;
pub mod rules;

use crate::models::{ParsedBill, ValidationFlag};
use crate::pricing::PriceTable;

/// Run every rule in its fixed order and concatenate the findings.
///
/// Price-dependent rules degrade to zero findings against an empty table;
/// no rule's outcome can prevent another rule from running.
pub fn run_validations(bill: &ParsedBill, prices: &PriceTable) -> Vec<ValidationFlag> {
    let mut flags = Vec::new();

    if let Some(flag) = rules::check_missing_claim_id(bill) {
        flags.push(flag);
    }
    flags.extend(rules::check_outlier_pricing(bill, prices));
    flags.extend(rules::check_denial_reasons(bill));
    flags.extend(rules::check_duplicates(bill));
    flags.extend(rules::check_invalid_cpt_codes(bill, prices));

    tracing::debug!(
        session_id = %bill.session_id,
        flag_count = flags.len(),
        "Validation battery complete"
    );

    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LineItem;
    use crate::pipeline::assemble::assemble_bill;

    fn item(code: Option<&str>, amount: Option<f64>) -> LineItem {
        LineItem {
            cpt_code: code.map(str::to_string),
            description: None,
            billed_amount: amount,
            reference_price: None,
        }
    }

    #[test]
    fn battery_is_idempotent() {
        let mut bill = assemble_bill("EOB statement, denied service 06/15/24").unwrap();
        bill.line_items = vec![
            item(Some("99213"), Some(600.0)),
            item(Some("99213"), Some(600.0)),
        ];
        let prices = PriceTable::from_pairs([("99213", 100.0)]);

        let first = run_validations(&bill, &prices);
        let second = run_validations(&bill, &prices);
        assert_eq!(first, second);
    }

    #[test]
    fn rule_order_is_fixed() {
        let mut bill = assemble_bill("EOB notice: claim denied").unwrap();
        bill.line_items = vec![
            item(Some("99213"), Some(600.0)),
            item(Some("99213"), Some(600.0)),
            item(Some("00000"), Some(10.0)),
        ];
        let prices = PriceTable::from_pairs([("99213", 100.0)]);

        let ids: Vec<_> = run_validations(&bill, &prices)
            .into_iter()
            .map(|f| f.flag_id)
            .collect();
        assert_eq!(
            ids,
            vec![
                "missing_claim_id",
                "outlier_pricing_line_item",
                "outlier_pricing_line_item",
                "denial_reason_found",
                "duplicate_line_item",
                "invalid_cpt_code",
            ]
        );
    }

    #[test]
    fn end_to_end_eob_yields_exactly_two_findings() {
        let mut bill = assemble_bill("EOB for visit on 06/15/24, no claim listed").unwrap();
        bill.line_items = vec![item(Some("99213"), Some(600.0))];
        let prices = PriceTable::from_pairs([("99213", 100.0)]);

        let flags = run_validations(&bill, &prices);
        let ids: Vec<_> = flags.iter().map(|f| f.flag_id.as_str()).collect();
        assert_eq!(ids, vec!["missing_claim_id", "outlier_pricing_line_item"]);
    }

    #[test]
    fn empty_table_still_runs_text_rules() {
        let bill = assemble_bill("Explanation of Benefits: service not covered").unwrap();
        let flags = run_validations(&bill, &PriceTable::default());
        let ids: Vec<_> = flags.iter().map(|f| f.flag_id.as_str()).collect();
        assert_eq!(ids, vec!["missing_claim_id", "denial_reason_found"]);
    }
}
