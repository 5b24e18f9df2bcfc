//! Declarative pattern rules for field extraction.
//!
//! Bills and EOBs have no fixed layout, so extraction is labeled-prefix and
//! shape matching: each scalar field is a (field, regex) pair whose first
//! capture group is the candidate value. Keeping the rules as data keeps each
//! one independently testable against literal strings.

use std::sync::LazyLock;

use regex::Regex;

/// Scalar fields the labeled-prefix pass can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillField {
    Provider,
    PatientName,
    ClaimId,
    DateOfService,
    TotalBilled,
    AmountDue,
    PatientResponsibility,
}

/// One pattern rule: a target field and the regex whose first capture group
/// yields its candidate value.
pub struct FieldPattern {
    pub field: BillField,
    regex: Regex,
}

fn rule(field: BillField, pattern: &str) -> FieldPattern {
    FieldPattern {
        field,
        regex: Regex::new(pattern).expect("invalid field pattern"),
    }
}

/// The fixed battery of labeled-prefix rules, one per scalar field.
/// First match wins; a field with no match stays absent.
pub static FIELD_PATTERNS: LazyLock<Vec<FieldPattern>> = LazyLock::new(|| {
    vec![
        rule(
            BillField::Provider,
            r"(?i)\b(?:Provider|Billed by|From|Clinic|Hospital)[:\s]*([^\n\r]*)",
        ),
        rule(
            BillField::PatientName,
            r"(?i)\b(?:Patient Name|Patient|For|Billed to|To)\b[:\s]*([^\n\r]*)",
        ),
        rule(
            BillField::ClaimId,
            r"(?i)(?:Claim Number|Claim #|EOB ID)[:\s#]*([\w\s-]+?)\s*\n",
        ),
        rule(
            BillField::DateOfService,
            r"(\d{1,2}[/-]\d{1,2}[/-]\d{2,4}|\d{4}-\d{2}-\d{2})",
        ),
        rule(
            BillField::TotalBilled,
            r"(?i)(?:Total Charges|Totals|Hospital charges)[:\s$]*([\d,]+\.\d{2})",
        ),
        rule(BillField::AmountDue, r"(?i)Amount Due[:\s$]*([\d,]+\.\d{2})"),
        rule(
            BillField::PatientResponsibility,
            r"(?i)(?:You pay|Your total cost|Patient Responsibility)[:\s$]*([\d,]+\.\d{2})",
        ),
    ]
});

/// EOB-style service line: date, free text, billed charge, free text,
/// patient responsibility, all on one line. No procedure code expected;
/// EOB statements commonly omit it.
pub static LINE_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(\d{2}/\d{2}/\d{2,4})\s+.*?\s+([\d,]+\.\d{2}).*?\s+([\d,]+\.\d{2})$")
        .expect("invalid line item pattern")
});

/// CPT-shaped token: four digits plus one trailing digit or uppercase letter.
/// Shape match only, not validated against a coding standard.
pub static CPT_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4}[A-Z0-9])\b").expect("invalid CPT pattern"));

/// ICD-shaped token: letter, digit, alphanumeric, optional decimal suffix.
pub static ICD_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b([A-TV-Z][0-9][A-Z0-9](?:\.[A-Z0-9]{1,4})?)\b")
        .expect("invalid ICD pattern")
});

impl FieldPattern {
    /// First match's first capture group, trimmed. `None` when the pattern
    /// does not match; callers never see partial or garbled matches beyond
    /// what the capture itself holds.
    pub fn first_capture(&self, text: &str) -> Option<String> {
        first_capture(&self.regex, text)
    }
}

/// First capture group of the first match, trimmed of surrounding whitespace.
pub fn first_capture(regex: &Regex, text: &str) -> Option<String> {
    regex
        .captures(text)?
        .get(1)
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capture(field: BillField, text: &str) -> Option<String> {
        FIELD_PATTERNS
            .iter()
            .find(|p| p.field == field)
            .unwrap()
            .first_capture(text)
    }

    #[test]
    fn provider_label_variants() {
        assert_eq!(
            capture(BillField::Provider, "Provider: City Medical Group\n"),
            Some("City Medical Group".into())
        );
        assert_eq!(
            capture(BillField::Provider, "Billed by St. Mary Hospital\n"),
            Some("St. Mary Hospital".into())
        );
    }

    #[test]
    fn patient_name_label() {
        assert_eq!(
            capture(BillField::PatientName, "Patient Name: Jane Doe\n"),
            Some("Jane Doe".into())
        );
    }

    #[test]
    fn claim_id_requires_line_end() {
        assert_eq!(
            capture(BillField::ClaimId, "Claim Number: ABC-12345\nDate: 01/01/24\n"),
            Some("ABC-12345".into())
        );
        // The pattern anchors on a trailing newline; a claim id on the final
        // unterminated line is missed.
        assert_eq!(capture(BillField::ClaimId, "Claim Number: ABC-12345"), None);
    }

    #[test]
    fn eob_id_label_matches_claim_field() {
        assert_eq!(
            capture(BillField::ClaimId, "EOB ID # 776-221\n"),
            Some("776-221".into())
        );
    }

    #[test]
    fn date_of_service_takes_first_date_anywhere() {
        assert_eq!(
            capture(BillField::DateOfService, "Visit on 06/15/2024 and 07/01/2024"),
            Some("06/15/2024".into())
        );
        assert_eq!(
            capture(BillField::DateOfService, "ISO date 2024-06-15 here"),
            Some("2024-06-15".into())
        );
    }

    #[test]
    fn total_billed_label_variants() {
        assert_eq!(
            capture(BillField::TotalBilled, "Total Charges: $1,250.00\n"),
            Some("1,250.00".into())
        );
        assert_eq!(
            capture(BillField::TotalBilled, "Hospital charges $88.20\n"),
            Some("88.20".into())
        );
    }

    #[test]
    fn patient_responsibility_label_variants() {
        assert_eq!(
            capture(BillField::PatientResponsibility, "You pay: $45.00\n"),
            Some("45.00".into())
        );
        assert_eq!(
            capture(BillField::PatientResponsibility, "Patient Responsibility $12.00\n"),
            Some("12.00".into())
        );
    }

    #[test]
    fn unmatched_field_is_absent() {
        assert_eq!(capture(BillField::TotalBilled, "nothing billable here"), None);
    }

    #[test]
    fn line_item_captures_date_and_both_amounts() {
        let caps = LINE_ITEM
            .captures("06/15/24  Office visit  150.00  copay  30.00")
            .unwrap();
        assert_eq!(&caps[1], "06/15/24");
        assert_eq!(&caps[2], "150.00");
        assert_eq!(&caps[3], "30.00");
    }

    #[test]
    fn line_item_requires_two_amounts() {
        assert!(LINE_ITEM.captures("06/15/24  Office visit  150.00").is_none());
    }

    #[test]
    fn cpt_shape_matches_five_char_codes() {
        let codes: Vec<_> = CPT_CODE
            .captures_iter("codes 99213 and 0042T but not 123 or 123456")
            .map(|c| c[1].to_string())
            .collect();
        assert_eq!(codes, vec!["99213", "0042T"]);
    }

    #[test]
    fn icd_shape_matches_with_decimal_suffix() {
        let codes: Vec<_> = ICD_CODE
            .captures_iter("dx E11.9 and J45")
            .map(|c| c[1].to_string())
            .collect();
        assert!(codes.contains(&"E11.9".to_string()));
        assert!(codes.contains(&"J45".to_string()));
    }
}
