// SQLite store - the relational backing for the catalog
//
// Mirrors the in-memory model across three tables (companies, products,
// pricing_rules). Seeding is all-or-nothing: the whole catalog is written
// inside one transaction and any failure rolls everything back, so a
// half-seeded store can never serve requests.

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use crate::catalog::Catalog;
use crate::model::{Company, Product};
use crate::premium::PremiumTier;

/// Create tables and enable WAL mode.
pub fn setup_database(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS companies (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            type TEXT,
            description TEXT
        )",
        [],
    )
    .context("Failed to create companies table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS products (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            category TEXT NOT NULL,
            company_id INTEGER REFERENCES companies(id),
            description TEXT,
            waiting_period_natural TEXT,
            waiting_period_accidental TEXT,
            age_min INTEGER,
            age_max INTEGER,
            exclusions TEXT,
            key_features TEXT,
            annual_limit REAL,
            co_payment TEXT,
            hospital_network TEXT,
            maternity_cover TEXT,
            chronic_cover TEXT,
            dental_optical TEXT,
            sum_assured TEXT,
            premiums TEXT
        )",
        [],
    )
    .context("Failed to create products table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS pricing_rules (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            product_id INTEGER REFERENCES products(id),
            min_salary REAL,
            max_salary REAL,
            monthly_premium REAL NOT NULL
        )",
        [],
    )
    .context("Failed to create pricing_rules table")?;

    Ok(())
}

/// Seed the store from a built catalog - the Strict path.
///
/// Clears all three tables and writes the full catalog inside a single
/// transaction; any error aborts the seed and rolls back to the previous
/// contents.
pub fn seed_catalog(conn: &mut Connection, catalog: &Catalog) -> Result<()> {
    let tx = conn
        .transaction()
        .context("Failed to begin seed transaction")?;

    tx.execute("DELETE FROM pricing_rules", [])?;
    tx.execute("DELETE FROM products", [])?;
    tx.execute("DELETE FROM companies", [])?;

    for company in catalog.companies() {
        tx.execute(
            "INSERT INTO companies (id, name, type) VALUES (?1, ?2, ?3)",
            params![company.id, company.name, company.company_type],
        )
        .with_context(|| format!("Failed to insert company {}", company.name))?;
    }

    for product in catalog.products() {
        let key_features = serde_json::to_string(&product.key_features)?;
        let premiums = serde_json::to_string(&product.premiums)?;

        tx.execute(
            "INSERT INTO products (
                id, name, category, company_id, description,
                waiting_period_natural, waiting_period_accidental,
                age_min, age_max, exclusions, key_features,
                annual_limit, co_payment, hospital_network,
                maternity_cover, chronic_cover, dental_optical,
                sum_assured, premiums
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)",
            params![
                product.id,
                product.name,
                product.category,
                product.company_id,
                product.description,
                product.waiting_period_natural,
                product.waiting_period_accidental,
                product.age_min,
                product.age_max,
                product.exclusions,
                key_features,
                product.annual_limit,
                product.co_payment,
                product.hospital_network,
                product.maternity_cover,
                product.chronic_cover,
                product.dental_optical,
                product.sum_assured,
                premiums,
            ],
        )
        .with_context(|| format!("Failed to insert product {}", product.name))?;

        for tier in &product.premiums {
            tx.execute(
                "INSERT INTO pricing_rules (product_id, min_salary, max_salary, monthly_premium)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    product.id,
                    tier.min_salary,
                    tier.max_salary,
                    tier.monthly_premium
                ],
            )?;
        }
    }

    tx.commit().context("Failed to commit seed transaction")?;

    Ok(())
}

/// Load the full catalog back from the store.
pub fn load_catalog(conn: &Connection) -> Result<Catalog> {
    let mut stmt = conn
        .prepare("SELECT id, name, type FROM companies ORDER BY id")
        .context("Failed to prepare companies query")?;

    let companies: Vec<Company> = stmt
        .query_map([], |row| {
            Ok(Company {
                id: row.get(0)?,
                name: row.get(1)?,
                company_type: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            })
        })?
        .collect::<rusqlite::Result<_>>()
        .context("Failed to read companies")?;

    let mut stmt = conn
        .prepare(
            "SELECT id, name, category, company_id, description,
                    waiting_period_natural, waiting_period_accidental,
                    age_min, age_max, exclusions, key_features,
                    annual_limit, co_payment, hospital_network,
                    maternity_cover, chronic_cover, dental_optical,
                    sum_assured, premiums
             FROM products ORDER BY id",
        )
        .context("Failed to prepare products query")?;

    let products: Vec<Product> = stmt
        .query_map([], |row| {
            let company_id: u32 = row.get(3)?;
            let key_features: Option<String> = row.get(10)?;
            let premiums: Option<String> = row.get(18)?;

            let company = companies
                .iter()
                .find(|c| c.id == company_id)
                .cloned()
                .unwrap_or_else(|| Company::new(company_id, "", ""));

            Ok(Product {
                id: row.get(0)?,
                name: row.get(1)?,
                category: row.get(2)?,
                company_id,
                company,
                description: row.get(4)?,
                waiting_period_natural: row.get(5)?,
                waiting_period_accidental: row.get(6)?,
                age_min: row.get(7)?,
                age_max: row.get(8)?,
                exclusions: row.get(9)?,
                key_features: decode_json_column(key_features),
                annual_limit: row.get(11)?,
                co_payment: row.get(12)?,
                hospital_network: row.get(13)?,
                maternity_cover: row.get(14)?,
                chronic_cover: row.get(15)?,
                dental_optical: row.get(16)?,
                sum_assured: row.get(17)?,
                premiums: decode_json_column::<Vec<PremiumTier>>(premiums),
            })
        })?
        .collect::<rusqlite::Result<_>>()
        .context("Failed to read products")?;

    Ok(Catalog::from_parts(companies, products))
}

/// Per-category product counts for the seed summary.
pub fn category_counts(conn: &Connection) -> Result<Vec<(String, i64)>> {
    let mut stmt = conn
        .prepare("SELECT category, COUNT(*) FROM products GROUP BY category ORDER BY category")
        .context("Failed to prepare count query")?;

    let counts = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<rusqlite::Result<_>>()
        .context("Failed to count products")?;

    Ok(counts)
}

/// Total products stored.
pub fn verify_count(conn: &Connection) -> Result<i64> {
    let count = conn
        .query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))
        .optional()?
        .unwrap_or(0);
    Ok(count)
}

/// JSON text column into a typed list; unreadable columns decode to
/// empty (same permissive policy as source parsing).
fn decode_json_column<T: serde::de::DeserializeOwned + Default>(raw: Option<String>) -> T {
    raw.and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_companies;
    use crate::normalize::{MedicalPlanRecord, ProductNormalizer};
    use serde_json::json;

    fn seeded_conn() -> (Connection, Catalog) {
        let companies = default_companies();
        let mut normalizer = ProductNormalizer::new();

        let plan: MedicalPlanRecord = serde_json::from_value(json!({
            "plan_name": "Botsogo Standard",
            "annual_limit": "BWP 2,215,000",
            "co_payment": "10% on specialists",
            "waiting_period": "3 months general",
            "premiums": [
                {"min_salary": 0, "max_salary": 5000, "monthly_premium": 450},
                {"min_salary": 5000, "monthly_premium": 780}
            ]
        }))
        .unwrap();
        let product = normalizer.normalize_plan(&plan, &companies[2]);
        let catalog = Catalog::from_parts(companies, vec![product]);

        let mut conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();
        seed_catalog(&mut conn, &catalog).unwrap();

        (conn, catalog)
    }

    #[test]
    fn test_seed_and_load_round_trip() {
        let (conn, catalog) = seeded_conn();

        let loaded = load_catalog(&conn).unwrap();

        assert_eq!(loaded.companies(), catalog.companies());
        assert_eq!(loaded.products(), catalog.products());
    }

    #[test]
    fn test_seed_writes_pricing_rules() {
        let (conn, _) = seeded_conn();

        let rules: i64 = conn
            .query_row("SELECT COUNT(*) FROM pricing_rules", [], |row| row.get(0))
            .unwrap();

        assert_eq!(rules, 2);
    }

    #[test]
    fn test_reseed_replaces_previous_contents() {
        let (mut conn, catalog) = seeded_conn();

        seed_catalog(&mut conn, &catalog).unwrap();

        assert_eq!(verify_count(&conn).unwrap(), 1);
        let counts = category_counts(&conn).unwrap();
        assert_eq!(counts, vec![("medical".to_string(), 1)]);
    }
}
