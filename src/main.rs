use std::net::SocketAddr;

use tariff_engine::api::{AppState, create_router};
use tariff_engine::config::ConfigLoader;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tariff_engine=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_dir =
        std::env::var("TARIFF_CONFIG_DIR").unwrap_or_else(|_| "./config/default".into());
    let port: u16 = match std::env::var("PORT") {
        Ok(value) => value.parse()?,
        Err(_) => 3000,
    };

    let catalogue = ConfigLoader::load(&config_dir)?;
    let router = create_router(AppState::new(catalogue));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, config_dir = %config_dir, "Tariff engine listening");

    axum::serve(listener, router).await?;

    Ok(())
}
