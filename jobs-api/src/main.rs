use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{RepositoryKind, Settings};
use crate::domain::search::repository::{MemoryJobRepository, PgJobRepository, Seed};
use crate::domain::search::{JobRepository, SearchService};

mod app_state;
mod config;
mod domain;
mod router;
mod routes;

pub use app_state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::from_filename("./jobs-api/.env.local").ok();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,jobs_api=debug,tower_http=debug"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer())
        .init();

    let settings = config::read_config().context("Failed to read configuration")?;
    let app_state = build_state(&settings).await?;
    let app = router::create(app_state, &settings.application.app_url);

    let addr: SocketAddr = format!("{}:{}", settings.application.host, settings.application.port)
        .parse()
        .context("Invalid listen address")?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app).await?;
    Ok(())
}

async fn build_state(settings: &Settings) -> anyhow::Result<AppState> {
    match settings.application.repository {
        RepositoryKind::Postgres => {
            let pool = PgPoolOptions::new()
                .max_connections(settings.database.max_connections)
                .acquire_timeout(settings.database.acquire_timeout())
                .connect_with(settings.database.with_db())
                .await
                .context("Failed to connect to PostgreSQL")?;

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run migrations")?;
            tracing::info!(
                host = %settings.database.host,
                database = %settings.database.database_name,
                "Connected to PostgreSQL"
            );

            let repository: Arc<dyn JobRepository> = Arc::new(PgJobRepository::new(pool.clone()));
            Ok(AppState::new(
                SearchService::new(repository, settings.search.clone()),
                Some(pool),
            ))
        }
        RepositoryKind::Memory => {
            let seed = match &settings.application.seed_file {
                Some(path) => {
                    let raw = tokio::fs::read_to_string(path)
                        .await
                        .with_context(|| format!("Failed to read seed file {}", path.display()))?;
                    serde_json::from_str::<Seed>(&raw)
                        .with_context(|| format!("Invalid seed file {}", path.display()))?
                }
                None => Seed::default(),
            };
            let repository = MemoryJobRepository::from_seed(seed);
            tracing::info!(jobs = repository.len(), "Using in-memory job repository");

            Ok(AppState::new(
                SearchService::new(Arc::new(repository), settings.search.clone()),
                None,
            ))
        }
    }
}
