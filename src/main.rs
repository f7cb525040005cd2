use anyhow::Result;
use rusqlite::Connection;
use std::env;

use botsu_insure::{
    category_counts, seed_catalog, setup_database, verify_count, Catalog, Config, LoadPolicy,
};

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();

    if args.len() > 1 && args[1] == "seed" {
        run_seed()?;
    } else {
        run_summary()?;
    }

    Ok(())
}

/// Strict build + SQLite seed. Any bad source or insert failure aborts
/// the whole run and leaves the store untouched.
fn run_seed() -> Result<()> {
    let config = Config::from_env();

    println!("🗄️  BotsuInsure - Seeding catalog into SQLite");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    println!("\n📂 Building catalog from {:?}...", config.data_dir);
    let catalog = Catalog::build_from_dir(&config.data_dir, LoadPolicy::Strict)?;
    println!(
        "✓ Built {} products across {} companies",
        catalog.products().len(),
        catalog.companies().len()
    );

    println!("\n🔧 Setting up database {:?}...", config.database_path);
    let mut conn = Connection::open(&config.database_path)?;
    setup_database(&conn)?;
    println!("✓ Database initialized with WAL mode");

    println!("\n💾 Seeding catalog...");
    seed_catalog(&mut conn, &catalog)?;

    let count = verify_count(&conn)?;
    println!("✓ Store contains {} products", count);

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("✅ Seed complete");
    for (category, count) in category_counts(&conn)? {
        println!("✓ {}: {}", category, count);
    }

    Ok(())
}

/// Lenient build with a product listing, for a quick data check.
fn run_summary() -> Result<()> {
    let config = Config::from_env();

    println!("📊 BotsuInsure - Catalog summary");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let catalog = Catalog::build_from_dir(&config.data_dir, LoadPolicy::Lenient)?;

    println!(
        "\n✓ Loaded {} products from {:?}\n",
        catalog.products().len(),
        config.data_dir
    );
    for product in catalog.products() {
        println!("  - {} ({})", product.name, product.company.name);
    }

    println!("\nRun `botsu-insure seed` to seed the SQLite store.");

    Ok(())
}
