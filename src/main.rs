use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use beatwise_api::{
    catalog::Catalog,
    config::Config,
    routes::{create_router, AppState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let catalog = Catalog::load(&config.snapshot_path).with_context(|| {
        format!("Failed to load snapshot {}", config.snapshot_path.display())
    })?;
    tracing::info!(
        songs = catalog.len(),
        distinct_names = catalog.distinct_names(),
        "Catalog ready"
    );

    let address = config.bind_address();
    let state = Arc::new(AppState::new(catalog, config));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    tracing::info!(address = %address, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
