// Premium tiers - normalization and salary-band resolution
//
// Source files represent pricing three ways: a structured list of
// salary-banded tiers, a free-text string with a single Pula amount, or
// nothing at all. Everything is normalized into an ordered Vec<PremiumTier>
// at load time so the rest of the system never sees the raw shapes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::extract::first_numeric_run;

/// One salary band with its flat monthly premium.
///
/// Absent bounds are open: no `min_salary` means 0, no `max_salary`
/// means unbounded. A synthetic tier built from a free-text premium has
/// neither bound and therefore matches any salary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PremiumTier {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_salary: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_salary: Option<f64>,

    pub monthly_premium: f64,
}

impl PremiumTier {
    /// Tier with no salary band - matches every salary.
    pub fn flat(monthly_premium: f64) -> Self {
        PremiumTier {
            min_salary: None,
            max_salary: None,
            monthly_premium,
        }
    }

    /// Whether `salary` falls inside this band (both bounds inclusive).
    pub fn covers(&self, salary: f64) -> bool {
        let min = self.min_salary.unwrap_or(0.0);
        let max = self.max_salary.unwrap_or(f64::INFINITY);
        min <= salary && salary <= max
    }
}

// ============================================================================
// PREMIUM NORMALIZER
// ============================================================================

/// Normalize a source premium field into an ordered tier list.
///
/// - A JSON array passes through; entries that are not tier-shaped
///   (no numeric `monthly_premium`) are dropped, not errored.
/// - A string with a Pula marker ("P"/"p") and a numeric run becomes a
///   single flat tier from the first number found.
/// - Anything else (absent, wrong type, no extractable number) yields an
///   empty list.
///
/// Parse failures are swallowed by policy: pricing that cannot be read
/// simply does not price, and a debug diagnostic records what was skipped.
pub fn normalize_premiums(raw: Option<&Value>) -> Vec<PremiumTier> {
    match raw {
        Some(Value::Array(entries)) => entries
            .iter()
            .filter_map(|entry| match serde_json::from_value::<PremiumTier>(entry.clone()) {
                Ok(tier) => Some(tier),
                Err(err) => {
                    tracing::debug!(%entry, %err, "skipping non-tier premium entry");
                    None
                }
            })
            .collect(),
        Some(Value::String(text)) => premium_from_text(text).into_iter().collect(),
        _ => Vec::new(),
    }
}

/// Single flat tier from a free-text premium ("P250 per month"), if the
/// text carries a Pula marker and a numeric run.
fn premium_from_text(text: &str) -> Option<PremiumTier> {
    if !text.contains('P') && !text.contains('p') {
        return None;
    }
    first_numeric_run(text).map(PremiumTier::flat)
}

// ============================================================================
// PREMIUM RESOLVER
// ============================================================================

/// Monthly premium for `salary`, from the first tier whose band covers it.
///
/// Tiers are scanned in the order given - no sorting, no overlap
/// validation. Overlapping bands resolve to whichever comes first. An
/// empty or non-matching tier list yields None; callers surface that as
/// an absent calculated value, never an error.
pub fn resolve_premium(tiers: &[PremiumTier], salary: f64) -> Option<f64> {
    tiers
        .iter()
        .find(|tier| tier.covers(salary))
        .map(|tier| tier.monthly_premium)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_list_passes_through() {
        let raw = json!([
            {"min_salary": 0, "max_salary": 5000, "monthly_premium": 100},
            {"min_salary": 5000, "monthly_premium": 200}
        ]);

        let tiers = normalize_premiums(Some(&raw));

        assert_eq!(tiers.len(), 2);
        assert_eq!(tiers[0].min_salary, Some(0.0));
        assert_eq!(tiers[0].max_salary, Some(5000.0));
        assert_eq!(tiers[0].monthly_premium, 100.0);
        assert_eq!(tiers[1].max_salary, None);
        assert_eq!(tiers[1].monthly_premium, 200.0);
    }

    #[test]
    fn test_normalize_list_drops_non_tier_entries() {
        let raw = json!([
            {"age_band": "18-65", "note": "call us"},
            {"monthly_premium": 150}
        ]);

        let tiers = normalize_premiums(Some(&raw));

        assert_eq!(tiers, vec![PremiumTier::flat(150.0)]);
    }

    #[test]
    fn test_normalize_text_premium() {
        let raw = json!("P250 per month");

        let tiers = normalize_premiums(Some(&raw));

        assert_eq!(tiers, vec![PremiumTier::flat(250.0)]);
    }

    #[test]
    fn test_normalize_text_without_currency_marker() {
        let raw = json!("250 monthly");
        assert!(normalize_premiums(Some(&raw)).is_empty());
    }

    #[test]
    fn test_normalize_text_without_digits() {
        let raw = json!("Premium on application");
        assert!(normalize_premiums(Some(&raw)).is_empty());
    }

    #[test]
    fn test_normalize_absent_field() {
        assert!(normalize_premiums(None).is_empty());
    }

    #[test]
    fn test_normalize_non_list_non_string() {
        let raw = json!(250);
        assert!(normalize_premiums(Some(&raw)).is_empty());
    }

    #[test]
    fn test_flat_tier_serializes_without_bounds() {
        let value = serde_json::to_value(PremiumTier::flat(250.0)).unwrap();
        assert_eq!(value, json!({"monthly_premium": 250.0}));
    }

    fn banded_tiers() -> Vec<PremiumTier> {
        vec![
            PremiumTier {
                min_salary: Some(0.0),
                max_salary: Some(5000.0),
                monthly_premium: 100.0,
            },
            PremiumTier {
                min_salary: Some(5000.0),
                max_salary: None,
                monthly_premium: 200.0,
            },
        ]
    }

    #[test]
    fn test_resolve_inside_first_band() {
        assert_eq!(resolve_premium(&banded_tiers(), 3000.0), Some(100.0));
    }

    #[test]
    fn test_resolve_overlap_first_match_wins() {
        // 5000 is inside both bands (bounds inclusive) - first tier wins.
        assert_eq!(resolve_premium(&banded_tiers(), 5000.0), Some(100.0));
    }

    #[test]
    fn test_resolve_upper_band() {
        assert_eq!(resolve_premium(&banded_tiers(), 10_000.0), Some(200.0));
    }

    #[test]
    fn test_resolve_empty_tiers() {
        assert_eq!(resolve_premium(&[], 3000.0), None);
    }

    #[test]
    fn test_resolve_no_matching_band() {
        let tiers = vec![PremiumTier {
            min_salary: Some(10_000.0),
            max_salary: None,
            monthly_premium: 500.0,
        }];
        assert_eq!(resolve_premium(&tiers, 3000.0), None);
    }

    #[test]
    fn test_flat_tier_matches_any_salary() {
        let tiers = vec![PremiumTier::flat(250.0)];
        assert_eq!(resolve_premium(&tiers, 0.0), Some(250.0));
        assert_eq!(resolve_premium(&tiers, 1_000_000.0), Some(250.0));
    }
}
