use dotenvy::dotenv;
use pharmacy_points::{
    config::{catalog, database},
    core::{ProductService, catalog::seed_catalog},
    errors::Result,
};
use std::path::Path;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; variables may also be set externally
    dotenv().ok();

    // 3. Connect and make sure every table exists
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 4. Seed the catalog if a catalog file is present
    let catalog_path = catalog::catalog_path();
    if Path::new(&catalog_path).exists() {
        let config = catalog::load_config(&catalog_path)?;
        seed_catalog(&db, &config)
            .await
            .inspect_err(|e| error!("Failed to seed catalog: {}", e))?;
    } else {
        warn!("No catalog file at {}, skipping seeding.", catalog_path);
    }

    // 5. Report what the service will serve
    let service = ProductService::new(db);
    let forms = service.get_product_forms().await?;
    let products = service.list_products().await?;
    let enrolled = products.iter().filter(|p| p.is_in_program).count();
    info!(
        "Catalog ready: {} product forms, {} products ({} in program).",
        forms.len(),
        products.len(),
        enrolled
    );

    Ok(())
}
