use std::sync::Arc;

use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use common::database::{DatabaseConfig, init_pool};
use tokio::net::TcpListener;

use api::config::AppConfig;
use api::images::HttpImageHost;
use api::payment::StripeProvider;
use api::routes::{create_router, create_router_with_origin};
use api::state::AppState;
use api::store::{PgCatalogStore, PgCredentialStore, ensure_schema};
use api::token::TokenService;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting booking API service");

    let config = AppConfig::from_env()?;

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if common::database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    ensure_schema(&pool).await?;

    let state = AppState {
        credentials: Arc::new(PgCredentialStore::new(pool.clone())),
        catalog: Arc::new(PgCatalogStore::new(pool)),
        payments: Arc::new(StripeProvider::new(
            config.stripe_secret_key.clone(),
            config.stripe_api_base.clone(),
        )),
        images: Arc::new(HttpImageHost::new(
            config.asset_upload_url.clone(),
            config.asset_api_key.clone(),
        )),
        tokens: TokenService::new(&config.jwt_secret),
        cookie_secure: config.cookie_secure,
    };

    // Start the web server
    let app = match config.frontend_origin.as_deref() {
        Some(origin) => create_router_with_origin(state, origin)?,
        None => create_router(state),
    };

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Booking API service listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
