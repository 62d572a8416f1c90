//! Backend entry-point: loads settings, prepares adapters and runs the server.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use recipe_backend::inbound::http::health::HealthState;
use recipe_backend::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use recipe_backend::outbound::storage::FsImageStore;
use server::{ServerConfig, ServerSettings, create_server};

fn startup_error(context: &str, err: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(format!("{context}: {err}"))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        ServerSettings::load().map_err(|err| startup_error("failed to load settings", err))?;
    let bind_addr = settings
        .bind_addr()
        .map_err(|err| startup_error("invalid bind address", err))?;
    let images = FsImageStore::open(&settings.media_root(), settings.media_url())
        .map_err(|err| startup_error("media storage unavailable", err))?;
    let mut config = ServerConfig::new(bind_addr, images);

    match settings.database_url() {
        Some(url) => {
            run_migrations(url)
                .await
                .map_err(|err| startup_error("database migrations failed", err))?;
            let pool = DbPool::new(
                PoolConfig::new(url).with_max_size(settings.db_max_connections()),
            )
            .await
            .map_err(|err| startup_error("database pool unavailable", err))?;
            config = config.with_db_pool(pool);
        }
        None => warn!("RECIPES_DATABASE_URL is not set; using the in-memory store"),
    }

    #[cfg(feature = "metrics")]
    let config = config.with_metrics(Some(server::prometheus()?));

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "server listening");
    server.await
}
