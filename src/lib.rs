// BotsuInsure - Botswana insurance catalog and comparison engine
// Exposes all modules for use in the CLI, API server, and tests

pub mod catalog;
pub mod compare;
pub mod config;
pub mod db;
pub mod extract;
pub mod model;
pub mod normalize;
pub mod premium;

// Re-export commonly used types
pub use catalog::{
    default_companies, source_manifest, Catalog, CatalogError, LoadPolicy, SourceSpec,
};
pub use compare::{
    assemble_comparison, parse_id_list, quote_products, ComparisonDetails, ComparisonEntry,
    PremiumQuote,
};
pub use config::{CatalogBackend, Config};
pub use db::{category_counts, load_catalog, seed_catalog, setup_database, verify_count};
pub use extract::{extract_number, first_numeric_run};
pub use model::{Company, Product};
pub use normalize::{LifeFuneralRecord, MedicalPlanRecord, ProductNormalizer, SourceDocument};
pub use premium::{normalize_premiums, resolve_premium, PremiumTier};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
