// Canonical catalog entities
//
// All source shapes are normalized into these two types at build time.
// Both are immutable after the catalog is built - there is no per-entity
// mutation API, a rebuild replaces the whole catalog.

use serde::{Deserialize, Serialize};

use crate::premium::PremiumTier;

/// An insurance company selling products in the catalog.
///
/// `company_type` is an informational tag (medical, life, funeral,
/// life_funeral, hospital_cash) - free text by design, not a closed enum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub company_type: String,
}

impl Company {
    pub fn new(id: u32, name: &str, company_type: &str) -> Self {
        Company {
            id,
            name: name.to_string(),
            company_type: company_type.to_string(),
        }
    }
}

/// The canonical product every source shape is normalized into.
///
/// Ids are assigned sequentially per catalog build and are not stable
/// across rebuilds. Category is free text (medical, life, funeral,
/// hospital_cash). Fields absent from a source record stay None - they
/// are never defaulted to empty strings; `key_features` and `premiums`
/// default to empty lists instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u32,
    pub name: String,
    pub category: String,
    pub company_id: u32,
    pub company: Company,

    // Common fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waiting_period_natural: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waiting_period_accidental: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_min: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_max: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusions: Option<String>,
    #[serde(default)]
    pub key_features: Vec<String>,

    // Medical-only fields (annual_limit is always numeric, extracted
    // from the source text at normalization time)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_limit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co_payment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hospital_network: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maternity_cover: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chronic_cover: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dental_optical: Option<String>,

    // Life/Funeral-only (amounts are not uniformly numeric across
    // sources, so kept as text by design)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sum_assured: Option<String>,

    // Always a list, never a bare scalar, whatever the source shape was
    #[serde(default)]
    pub premiums: Vec<PremiumTier>,
}

impl Product {
    /// Same product in every field except the build-assigned id.
    /// Ids shift between rebuilds; content equality is what matters
    /// when comparing two builds of the same sources.
    pub fn same_content(&self, other: &Product) -> bool {
        let mut a = self.clone();
        let mut b = other.clone();
        a.id = 0;
        b.id = 0;
        a == b
    }
}
