// Product Normalizer - per-company source shapes into canonical Products
//
// Each company publishes its own JSON shape: medical aid schemes ship
// `{"plans": [...]}` keyed by plan_name, life/funeral/hospital-cash
// underwriters ship `{"products": [...]}` keyed by product_name. Shape
// dispatch lives in one place (the untagged SourceDocument enum) instead
// of ad hoc field-presence checks scattered through the loader.

use serde::Deserialize;
use serde_json::Value;

use crate::extract::extract_number;
use crate::model::{Company, Product};
use crate::premium::normalize_premiums;

// ============================================================================
// SOURCE SHAPES
// ============================================================================

/// One per-company source file. The container key decides the shape:
/// `plans` is the medical-aid layout, `products` is the cover layout.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SourceDocument {
    MedicalPlans { plans: Vec<MedicalPlanRecord> },
    CoverProducts { products: Vec<LifeFuneralRecord> },
}

/// Medical-aid plan as published by the scheme. No accidental-cause
/// waiting period and no key_features exist in this shape.
#[derive(Debug, Deserialize)]
pub struct MedicalPlanRecord {
    #[serde(default)]
    pub plan_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Free text like "BWP 2,215,000" or a bare number.
    #[serde(default)]
    pub annual_limit: Option<Value>,
    #[serde(default)]
    pub co_payment: Option<String>,
    #[serde(default)]
    pub hospital_network: Option<String>,
    #[serde(default)]
    pub maternity_cover: Option<String>,
    #[serde(default)]
    pub chronic_cover: Option<String>,
    #[serde(default)]
    pub dental_optical: Option<String>,
    /// Singular in this shape; maps to the natural-cause slot.
    #[serde(default)]
    pub waiting_period: Option<String>,
    /// Either a tier list or a free-text string.
    #[serde(default)]
    pub premiums: Option<Value>,
}

/// Life / funeral / hospital-cash product as published by the underwriter.
#[derive(Debug, Deserialize)]
pub struct LifeFuneralRecord {
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sum_assured: Option<String>,
    #[serde(default)]
    pub premiums: Option<Value>,
    #[serde(default)]
    pub waiting_period_natural: Option<String>,
    #[serde(default)]
    pub waiting_period_accidental: Option<String>,
    #[serde(default)]
    pub age_min: Option<i64>,
    #[serde(default)]
    pub age_max: Option<i64>,
    #[serde(default)]
    pub exclusions: Option<String>,
    #[serde(default)]
    pub key_features: Option<Vec<String>>,
}

// ============================================================================
// NORMALIZER
// ============================================================================

/// Normalizes source records into canonical Products, assigning
/// sequential ids from a per-build counter. Ids start at 1 and reset
/// with every new normalizer, so they are not stable across rebuilds.
pub struct ProductNormalizer {
    next_id: u32,
}

impl ProductNormalizer {
    pub fn new() -> Self {
        ProductNormalizer { next_id: 1 }
    }

    fn take_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Normalize every record in a source document.
    ///
    /// `default_category` applies to cover records missing a `category`
    /// field (each source file carries a shape-specific default such as
    /// "funeral" or "hospital_cash"). Medical plans ignore it - their
    /// category is always forced to "medical".
    pub fn normalize_document(
        &mut self,
        document: &SourceDocument,
        company: &Company,
        default_category: &str,
    ) -> Vec<Product> {
        match document {
            SourceDocument::MedicalPlans { plans } => plans
                .iter()
                .map(|plan| self.normalize_plan(plan, company))
                .collect(),
            SourceDocument::CoverProducts { products } => products
                .iter()
                .map(|record| self.normalize_cover(record, company, default_category))
                .collect(),
        }
    }

    /// Medical-plan shape → canonical Product.
    pub fn normalize_plan(&mut self, plan: &MedicalPlanRecord, company: &Company) -> Product {
        Product {
            id: self.take_id(),
            name: plan
                .plan_name
                .clone()
                .unwrap_or_else(|| "Unknown Plan".to_string()),
            category: "medical".to_string(),
            company_id: company.id,
            company: company.clone(),
            description: plan.description.clone(),
            waiting_period_natural: plan.waiting_period.clone(),
            // Not available in the medical shape; stays absent.
            waiting_period_accidental: None,
            age_min: None,
            age_max: None,
            exclusions: None,
            key_features: Vec::new(),
            annual_limit: Some(numeric_field(plan.annual_limit.as_ref())),
            co_payment: plan.co_payment.clone(),
            hospital_network: plan.hospital_network.clone(),
            maternity_cover: plan.maternity_cover.clone(),
            chronic_cover: plan.chronic_cover.clone(),
            dental_optical: plan.dental_optical.clone(),
            sum_assured: None,
            premiums: normalize_premiums(plan.premiums.as_ref()),
        }
    }

    /// Life/funeral/hospital-cash shape → canonical Product.
    pub fn normalize_cover(
        &mut self,
        record: &LifeFuneralRecord,
        company: &Company,
        default_category: &str,
    ) -> Product {
        let name = record
            .product_name
            .clone()
            .or_else(|| record.name.clone())
            .unwrap_or_else(|| "Unknown Product".to_string());

        Product {
            id: self.take_id(),
            name,
            category: record
                .category
                .clone()
                .unwrap_or_else(|| default_category.to_string()),
            company_id: company.id,
            company: company.clone(),
            description: record.description.clone(),
            waiting_period_natural: record.waiting_period_natural.clone(),
            waiting_period_accidental: record.waiting_period_accidental.clone(),
            age_min: record.age_min,
            age_max: record.age_max,
            exclusions: record.exclusions.clone(),
            key_features: record.key_features.clone().unwrap_or_default(),
            annual_limit: None,
            co_payment: None,
            hospital_network: None,
            maternity_cover: None,
            chronic_cover: None,
            dental_optical: None,
            sum_assured: record.sum_assured.clone(),
            premiums: normalize_premiums(record.premiums.as_ref()),
        }
    }
}

impl Default for ProductNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Numeric value from a field that may be a JSON number or free text.
fn numeric_field(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => extract_number(Some(s)),
        _ => 0.0,
    }
}

// ============================================================================
// TESTS
// ============================================================================
