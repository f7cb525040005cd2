// Comparison Assembler - side-by-side views over catalog products
//
// Builds the comparison entries behind /api/compare and the annotated
// quote list behind /api/products/calculate. Category decides which
// detail block an entry carries: medical products expose limits,
// networks, and an optionally-resolved premium; everything else exposes
// sum assured and the raw tier list.

use serde::Serialize;

use crate::catalog::Catalog;
use crate::model::Company;
use crate::premium::{resolve_premium, PremiumTier};

/// One row of a side-by-side comparison.
#[derive(Debug, Serialize)]
pub struct ComparisonEntry {
    pub id: u32,
    pub name: String,
    pub company: String,
    pub category: String,
    pub key_features: Vec<String>,
    // Always present, even though the medical source shape never
    // populates the accidental one - it simply appears null there.
    pub waiting_period_natural: Option<String>,
    pub waiting_period_accidental: Option<String>,
    #[serde(flatten)]
    pub details: ComparisonDetails,
}

/// Category-specific tail of a comparison entry.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ComparisonDetails {
    Medical {
        annual_limit: Option<f64>,
        co_payment: Option<String>,
        hospital_network: Option<String>,
        /// Present only when a salary was supplied and some tier
        /// matched it; omitted otherwise.
        #[serde(skip_serializing_if = "Option::is_none")]
        calculated_premium: Option<f64>,
    },
    Cover {
        sum_assured: Option<String>,
        premiums: Vec<PremiumTier>,
    },
}

/// Comparison entries for the requested product ids.
///
/// Ids with no matching product are silently dropped. Output follows
/// catalog order, not requested order.
pub fn assemble_comparison(
    catalog: &Catalog,
    ids: &[u32],
    salary: Option<f64>,
) -> Vec<ComparisonEntry> {
    catalog
        .products()
        .iter()
        .filter(|product| ids.contains(&product.id))
        .map(|product| {
            let details = if product.category == "medical" {
                ComparisonDetails::Medical {
                    annual_limit: product.annual_limit,
                    co_payment: product.co_payment.clone(),
                    hospital_network: product.hospital_network.clone(),
                    calculated_premium: salary
                        .and_then(|s| resolve_premium(&product.premiums, s)),
                }
            } else {
                ComparisonDetails::Cover {
                    sum_assured: product.sum_assured.clone(),
                    premiums: product.premiums.clone(),
                }
            };

            ComparisonEntry {
                id: product.id,
                name: product.name.clone(),
                company: product.company.name.clone(),
                category: product.category.clone(),
                key_features: product.key_features.clone(),
                waiting_period_natural: product.waiting_period_natural.clone(),
                waiting_period_accidental: product.waiting_period_accidental.clone(),
                details,
            }
        })
        .collect()
}

/// Parse a comma-separated id list; blank and non-numeric entries are
/// silently ignored.
pub fn parse_id_list(raw: &str) -> Vec<u32> {
    raw.split(',')
        .filter_map(|part| part.trim().parse().ok())
        .collect()
}

// ============================================================================
// PREMIUM QUOTES
// ============================================================================

/// One product of a category annotated with its resolved premium, for
/// the salary-tiered calculation endpoint.
#[derive(Debug, Serialize)]
pub struct PremiumQuote {
    pub id: u32,
    pub name: String,
    pub company: Company,
    pub category: String,
    pub annual_limit: Option<f64>,
    pub co_payment: Option<String>,
    pub waiting_period_natural: Option<String>,
    pub premiums: Vec<PremiumTier>,
    /// Null (not omitted) when no tier matches the salary.
    pub calculated_premium: Option<f64>,
}

/// All products of `category`, each annotated with the premium resolved
/// against `salary`.
pub fn quote_products(catalog: &Catalog, category: &str, salary: f64) -> Vec<PremiumQuote> {
    catalog
        .list_products(Some(category), None)
        .into_iter()
        .map(|product| PremiumQuote {
            id: product.id,
            name: product.name.clone(),
            company: product.company.clone(),
            category: product.category.clone(),
            annual_limit: product.annual_limit,
            co_payment: product.co_payment.clone(),
            waiting_period_natural: product.waiting_period_natural.clone(),
            premiums: product.premiums.clone(),
            calculated_premium: resolve_premium(&product.premiums, salary),
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
