use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use lb_premium::api::create_api_router;
use lb_premium::config::Config;
use lb_premium::entities::{primary_settup, setup_schema};
use lb_premium::{connect, StartupError};

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let db = connect(&config.database_url).await?;
    setup_schema(&db).await?;
    if config.seed_defaults {
        primary_settup(&db).await?;
    }

    let shared_db = Arc::new(db);
    let app = create_api_router(shared_db, &config);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %config.bind_addr, "Running");
    axum::serve(listener, app).await?;
    Ok(())
}
