// Number Extractor - pulls the amount out of free-text currency fields
//
// Source files mix currency codes, thousands separators, and prose around
// the number of interest ("BWP 2,215,000", "P250 per month"). This module
// finds the first numeric run and parses it; everything else in the text
// is ignored.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Digit groups with optional thousands commas and an optional
    /// decimal fraction: "2,215,000", "450.50", "100".
    static ref NUMERIC_RUN: Regex =
        Regex::new(r"\d+(?:,\d+)*(?:\.\d+)?").expect("numeric-run pattern is valid");
}

/// Extract a non-negative amount from an optional free-text field.
///
/// Missing input and text with no numeric run both yield 0 - callers
/// treat "missing" and "zero" identically. Currency codes, k/m
/// multipliers, and negative signs are not interpreted.
pub fn extract_number(text: Option<&str>) -> f64 {
    match text {
        Some(text) => first_numeric_run(text).unwrap_or(0.0),
        None => 0.0,
    }
}

/// First numeric run in `text`, commas stripped, or None if there is none.
pub fn first_numeric_run(text: &str) -> Option<f64> {
    let run = NUMERIC_RUN.find(text)?;
    run.as_str().replace(',', "").parse().ok()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_currency_amount() {
        assert_eq!(extract_number(Some("BWP 2,215,000")), 2_215_000.0);
    }

    #[test]
    fn test_extract_decimal_amount() {
        assert_eq!(extract_number(Some("P1,250.50 per family")), 1250.50);
    }

    #[test]
    fn test_extract_first_run_wins() {
        assert_eq!(extract_number(Some("P100 to P500")), 100.0);
    }

    #[test]
    fn test_extract_empty_string() {
        assert_eq!(extract_number(Some("")), 0.0);
    }

    #[test]
    fn test_extract_missing() {
        assert_eq!(extract_number(None), 0.0);
    }

    #[test]
    fn test_extract_no_digits() {
        assert_eq!(extract_number(Some("no digits here")), 0.0);
    }

    #[test]
    fn test_first_numeric_run_none() {
        assert_eq!(first_numeric_run("unlimited"), None);
    }
}
