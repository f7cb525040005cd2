// BotsuInsure - Web Server
// REST API over the insurance catalog, with Axum

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use botsu_insure::{
    assemble_comparison, load_catalog, parse_id_list, quote_products, Catalog, CatalogBackend,
    Config, LoadPolicy,
};

/// Shared application state
///
/// The catalog is built once at startup and read-only afterwards. A
/// re-seed means restarting (or constructing a fresh Arc and swapping it
/// in); concurrent rebuilds are not coordinated here.
#[derive(Clone)]
struct AppState {
    catalog: Arc<Catalog>,
}

// ============================================================================
// Query parameters
// ============================================================================

#[derive(Deserialize)]
struct ProductFilter {
    category: Option<String>,
    company: Option<String>,
}

#[derive(Deserialize)]
struct CompareParams {
    product_ids: String,
    salary: Option<f64>,
}

fn default_quote_category() -> String {
    "medical".to_string()
}

#[derive(Deserialize)]
struct CalculateParams {
    salary: f64,
    #[serde(default = "default_quote_category")]
    category: String,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET / - Liveness/welcome payload
async fn root() -> impl IntoResponse {
    Json(json!({
        "message": "BotsuInsure API - Compare Botswana Insurance Plans"
    }))
}

/// GET /api/products?category=&company=
async fn list_products(
    State(state): State<AppState>,
    Query(filter): Query<ProductFilter>,
) -> impl IntoResponse {
    let products = state
        .catalog
        .list_products(filter.category.as_deref(), filter.company.as_deref());

    Json(products.into_iter().cloned().collect::<Vec<_>>())
}

/// GET /api/products/:id - Single product or 404
async fn get_product(State(state): State<AppState>, Path(id): Path<u32>) -> impl IntoResponse {
    match state.catalog.get_product(id) {
        Ok(product) => (StatusCode::OK, Json(json!(product))).into_response(),
        Err(err) => (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": err.to_string()})),
        )
            .into_response(),
    }
}

/// GET /api/compare?product_ids=1,2,3&salary=
async fn compare_products(
    State(state): State<AppState>,
    Query(params): Query<CompareParams>,
) -> impl IntoResponse {
    let ids = parse_id_list(&params.product_ids);
    let comparison = assemble_comparison(&state.catalog, &ids, params.salary);

    Json(json!({ "comparison": comparison }))
}

/// GET /api/products/calculate?salary=&category=medical
async fn calculate_premiums(
    State(state): State<AppState>,
    Query(params): Query<CalculateParams>,
) -> impl IntoResponse {
    Json(quote_products(&state.catalog, &params.category, params.salary))
}

/// POST /api/leads - Lead capture (acknowledgment only, no persistence)
async fn create_lead(Json(lead): Json<Value>) -> impl IntoResponse {
    let lead_id = format!("LEAD-{}", uuid::Uuid::new_v4());
    tracing::info!(%lead_id, "lead captured");

    Json(json!({
        "success": true,
        "message": "Lead submitted successfully.",
        "lead_id": lead_id,
        "received_at": chrono::Utc::now().to_rfc3339(),
        "data": lead,
    }))
}

/// GET /api/companies - Fixed company list
async fn list_companies(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.catalog.companies().to_vec())
}

// ============================================================================
// Main Server
// ============================================================================

fn build_catalog(config: &Config) -> anyhow::Result<Catalog> {
    match config.backend {
        CatalogBackend::Json => {
            Ok(Catalog::build_from_dir(&config.data_dir, LoadPolicy::Lenient)?)
        }
        CatalogBackend::Sqlite => {
            let conn = Connection::open(&config.database_path)?;
            load_catalog(&conn)
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    println!("🌐 BotsuInsure - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let config = Config::from_env();

    let catalog = match build_catalog(&config) {
        Ok(catalog) => catalog,
        Err(err) => {
            eprintln!("❌ Failed to build catalog: {err:#}");
            eprintln!("   Check BOTSU_DATA_DIR / BOTSU_DB, or run: botsu-insure seed");
            std::process::exit(1);
        }
    };
    println!(
        "✓ Catalog ready: {} products, {} companies",
        catalog.products().len(),
        catalog.companies().len()
    );

    let state = AppState {
        catalog: Arc::new(catalog),
    };

    // Build API routes. The static /products/calculate segment takes
    // precedence over the :id capture.
    let api_routes = Router::new()
        .route("/products", get(list_products))
        .route("/products/calculate", get(calculate_premiums))
        .route("/products/:id", get(get_product))
        .route("/compare", get(compare_products))
        .route("/leads", post(create_lead))
        .route("/companies", get(list_companies))
        .with_state(state);

    let app = Router::new()
        .route("/", get(root))
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind to address");

    println!("\n🚀 Server running on http://{}", config.bind_addr);
    println!("   Products: http://{}/api/products", config.bind_addr);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
