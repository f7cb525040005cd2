// Catalog - the in-memory set of companies and products for one build
//
// Built once from the configured per-company source files (or loaded back
// from the SQLite store) and read-only afterwards. A rebuild constructs a
// fresh Catalog and the owner swaps the reference; nothing mutates in
// place.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::model::{Company, Product};
use crate::normalize::{ProductNormalizer, SourceDocument};

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum CatalogError {
    /// Unknown product id on detail lookup. The only anomaly surfaced to
    /// API callers; everything else degrades to defaults or omissions.
    #[error("Product not found")]
    ProductNotFound { id: u32 },

    /// A configured source file is absent.
    #[error("source file missing: {}", path.display())]
    SourceMissing { path: PathBuf },

    /// A source file exists but its contents do not match either shape.
    #[error("malformed source file {}: {reason}", path.display())]
    MalformedSource { path: PathBuf, reason: String },
}

// ============================================================================
// SOURCE CONFIGURATION
// ============================================================================

/// How the dir builder treats a bad source.
///
/// Lenient (the live-serving loader) logs a warning and skips that
/// source's contribution; Strict (the persistence-seeding loader) fails
/// the whole build on the first bad source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPolicy {
    Lenient,
    Strict,
}

/// One configured source file: which company owns its records and which
/// category cover records fall back to when they carry none.
#[derive(Debug, Clone)]
pub struct SourceSpec {
    pub filename: &'static str,
    pub company_id: u32,
    pub default_category: &'static str,
}

/// The fixed company list, in configured order.
pub fn default_companies() -> Vec<Company> {
    vec![
        Company::new(1, "Liberty Life Botswana (Pty) Limited", "life_funeral"),
        Company::new(2, "Metropolitan Life Botswana", "life"),
        Company::new(3, "Botsogo Health Plan", "medical"),
        Company::new(
            4,
            "Botswana Public Officers Medical Aid Scheme (BPOMAS)",
            "medical",
        ),
        Company::new(5, "Pula Medical Aid Fund (Pulamed)", "medical"),
    ]
}

/// The fixed set of per-company source files, in load order.
pub fn source_manifest() -> Vec<SourceSpec> {
    vec![
        SourceSpec {
            filename: "funeral_liberty_boago.json",
            company_id: 1,
            default_category: "funeral",
        },
        SourceSpec {
            filename: "hospital_cashback.json",
            company_id: 1,
            default_category: "hospital_cash",
        },
        SourceSpec {
            filename: "life_metropolitan_mothusi.json",
            company_id: 2,
            default_category: "life",
        },
        SourceSpec {
            filename: "medical_botsogo_2025.json",
            company_id: 3,
            default_category: "medical",
        },
        SourceSpec {
            filename: "medical_bpomas_2025.json",
            company_id: 4,
            default_category: "medical",
        },
        SourceSpec {
            filename: "medical_pulamed_2025.json",
            company_id: 5,
            default_category: "medical",
        },
    ]
}

// ============================================================================
// CATALOG
// ============================================================================

#[derive(Debug, Clone)]
pub struct Catalog {
    companies: Vec<Company>,
    products: Vec<Product>,
}

impl Catalog {
    /// Catalog from already-normalized parts (store-backed loads, tests).
    pub fn from_parts(companies: Vec<Company>, products: Vec<Product>) -> Self {
        Catalog {
            companies,
            products,
        }
    }

    /// Build the full catalog from every source in the manifest under
    /// `data_dir`. Not incremental: every call reconstructs everything.
    pub fn build_from_dir(data_dir: &Path, policy: LoadPolicy) -> Result<Self, CatalogError> {
        let companies = default_companies();
        let mut normalizer = ProductNormalizer::new();
        let mut products = Vec::new();

        for source in source_manifest() {
            let path = data_dir.join(source.filename);
            let company = companies
                .iter()
                .find(|c| c.id == source.company_id)
                .expect("manifest references a configured company");

            match load_source(&path) {
                Ok(document) => {
                    products.extend(normalizer.normalize_document(
                        &document,
                        company,
                        source.default_category,
                    ));
                }
                Err(err) => match policy {
                    LoadPolicy::Lenient => {
                        tracing::warn!(source = source.filename, %err, "skipping source file");
                    }
                    LoadPolicy::Strict => return Err(err),
                },
            }
        }

        tracing::info!(
            products = products.len(),
            companies = companies.len(),
            "catalog built"
        );

        Ok(Catalog {
            companies,
            products,
        })
    }

    /// All products, optionally filtered by exact category and/or
    /// case-insensitive substring of the owning company's name.
    /// Catalog (load) order, no pagination.
    pub fn list_products(&self, category: Option<&str>, company: Option<&str>) -> Vec<&Product> {
        let company_lower = company.map(str::to_lowercase);

        self.products
            .iter()
            .filter(|p| category.map_or(true, |c| p.category == c))
            .filter(|p| {
                company_lower
                    .as_deref()
                    .map_or(true, |c| p.company.name.to_lowercase().contains(c))
            })
            .collect()
    }

    /// Product by id, or NotFound. Never a partial/default product.
    pub fn get_product(&self, id: u32) -> Result<&Product, CatalogError> {
        self.products
            .iter()
            .find(|p| p.id == id)
            .ok_or(CatalogError::ProductNotFound { id })
    }

    /// All companies in configured order.
    pub fn companies(&self) -> &[Company] {
        &self.companies
    }

    /// All products in catalog order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }
}

/// Read and shape-dispatch one source file.
fn load_source(path: &Path) -> Result<SourceDocument, CatalogError> {
    let raw = fs::read_to_string(path).map_err(|_| CatalogError::SourceMissing {
        path: path.to_path_buf(),
    })?;

    serde_json::from_str(&raw).map_err(|err| CatalogError::MalformedSource {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fresh scratch directory for loader tests.
    fn scratch_dir(tag: &str) -> PathBuf {
        static COUNTER: AtomicU32 = AtomicU32::new(0);
        let dir = std::env::temp_dir().join(format!(
            "botsu-insure-test-{}-{}-{}",
            tag,
            std::process::id(),
            COUNTER.fetch_add(1, Ordering::SeqCst)
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_source(dir: &Path, filename: &str, body: &str) {
        fs::write(dir.join(filename), body).unwrap();
    }

    /// Minimal but complete set of manifest sources.
    fn write_full_sources(dir: &Path) {
        write_source(
            dir,
            "funeral_liberty_boago.json",
            r#"{"products": [{"product_name": "Boago Standard", "category": "funeral",
                "sum_assured": "P20,000", "waiting_period_natural": "6 months",
                "premiums": [{"monthly_premium": 55}]}]}"#,
        );
        write_source(
            dir,
            "hospital_cashback.json",
            r#"{"products": [{"product_name": "Hospital Cashback",
                "sum_assured": "P500 per night", "premiums": [{"monthly_premium": 80}]}]}"#,
        );
        write_source(
            dir,
            "life_metropolitan_mothusi.json",
            r#"{"products": [{"product_name": "Mothusi Life", "category": "life",
                "sum_assured": "P100,000"}]}"#,
        );
        write_source(
            dir,
            "medical_botsogo_2025.json",
            r#"{"plans": [{"plan_name": "Botsogo Standard", "annual_limit": "BWP 2,215,000",
                "premiums": [{"min_salary": 0, "max_salary": 5000, "monthly_premium": 450}]}]}"#,
        );
        write_source(
            dir,
            "medical_bpomas_2025.json",
            r#"{"plans": [{"plan_name": "BPOMAS High", "annual_limit": "BWP 1,500,000",
                "premiums": "P610 per month"}]}"#,
        );
        write_source(
            dir,
            "medical_pulamed_2025.json",
            r#"{"plans": [{"plan_name": "Pulamed Exec", "annual_limit": 900000}]}"#,
        );
    }

    #[test]
    fn test_build_from_full_dir() {
        let dir = scratch_dir("full");
        write_full_sources(&dir);

        let catalog = Catalog::build_from_dir(&dir, LoadPolicy::Strict).unwrap();

        assert_eq!(catalog.companies().len(), 5);
        assert_eq!(catalog.products().len(), 6);
        // Ids are sequential in load order across all sources.
        let ids: Vec<u32> = catalog.products().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
        // Category defaulting: hospital_cashback.json carries no category field.
        assert_eq!(catalog.products()[1].category, "hospital_cash");
    }

    #[test]
    fn test_lenient_build_skips_missing_sources() {
        let dir = scratch_dir("lenient");
        // Only one of six manifest files exists.
        write_source(
            dir.as_path(),
            "medical_botsogo_2025.json",
            r#"{"plans": [{"plan_name": "Botsogo Standard"}]}"#,
        );

        let catalog = Catalog::build_from_dir(&dir, LoadPolicy::Lenient).unwrap();

        assert_eq!(catalog.products().len(), 1);
        assert_eq!(catalog.products()[0].name, "Botsogo Standard");
    }

    #[test]
    fn test_strict_build_fails_on_missing_source() {
        let dir = scratch_dir("strict-missing");

        let err = Catalog::build_from_dir(&dir, LoadPolicy::Strict).unwrap_err();

        assert!(matches!(err, CatalogError::SourceMissing { .. }));
    }

    #[test]
    fn test_strict_build_fails_on_malformed_source() {
        let dir = scratch_dir("strict-malformed");
        write_full_sources(&dir);
        write_source(dir.as_path(), "medical_pulamed_2025.json", "{not json");

        let err = Catalog::build_from_dir(&dir, LoadPolicy::Strict).unwrap_err();
        assert!(matches!(err, CatalogError::MalformedSource { .. }));

        // Same dir still builds leniently from the remaining sources.
        let catalog = Catalog::build_from_dir(&dir, LoadPolicy::Lenient).unwrap();
        assert_eq!(catalog.products().len(), 5);
    }

    #[test]
    fn test_list_products_category_is_exact_and_case_sensitive() {
        let dir = scratch_dir("filter-category");
        write_full_sources(&dir);
        let catalog = Catalog::build_from_dir(&dir, LoadPolicy::Strict).unwrap();

        let medical = catalog.list_products(Some("medical"), None);
        assert_eq!(medical.len(), 3);
        assert!(medical.iter().all(|p| p.category == "medical"));

        assert!(catalog.list_products(Some("Medical"), None).is_empty());
        assert!(catalog.list_products(Some("medi"), None).is_empty());
    }

    #[test]
    fn test_list_products_company_substring_case_insensitive() {
        let dir = scratch_dir("filter-company");
        write_full_sources(&dir);
        let catalog = Catalog::build_from_dir(&dir, LoadPolicy::Strict).unwrap();

        let liberty = catalog.list_products(None, Some("liberty"));
        assert_eq!(liberty.len(), 2);

        let both = catalog.list_products(Some("medical"), Some("PULA"));
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].name, "Pulamed Exec");
    }

    #[test]
    fn test_get_product_not_found() {
        let dir = scratch_dir("not-found");
        write_full_sources(&dir);
        let catalog = Catalog::build_from_dir(&dir, LoadPolicy::Strict).unwrap();

        assert!(catalog.get_product(3).is_ok());
        let err = catalog.get_product(999).unwrap_err();
        assert!(matches!(err, CatalogError::ProductNotFound { id: 999 }));
        assert_eq!(err.to_string(), "Product not found");
    }

    #[test]
    fn test_rebuild_yields_same_content() {
        let dir = scratch_dir("rebuild");
        write_full_sources(&dir);

        let first = Catalog::build_from_dir(&dir, LoadPolicy::Strict).unwrap();
        let second = Catalog::build_from_dir(&dir, LoadPolicy::Strict).unwrap();

        assert_eq!(first.companies(), second.companies());
        assert_eq!(first.products().len(), second.products().len());
        for (a, b) in first.products().iter().zip(second.products()) {
            assert!(a.same_content(b));
        }
    }
}
