use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use chart_advisor::{
    config::{Config, StorageBackend},
    db::{create_pool, InMemoryStore, PgStore},
    routes::{create_router, AppState},
    services::{RandomSource, RecommendationEngine},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chart_advisor=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let engine = match config.storage {
        StorageBackend::Postgres => {
            let pool = create_pool(&config.database_url)
                .await
                .context("Failed to connect to database")?;
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run migrations")?;
            tracing::info!("Connected to PostgreSQL");

            let store = Arc::new(PgStore::new(pool));
            RecommendationEngine::new(store.clone(), store.clone(), store)
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            let store = Arc::new(InMemoryStore::new());
            RecommendationEngine::new(store.clone(), store.clone(), store)
        }
    };

    let random = match config.random_seed {
        Some(seed) => {
            tracing::info!(seed, "Using seeded recommendation sampling");
            RandomSource::Seeded(seed)
        }
        None => RandomSource::Entropy,
    };
    let engine = engine.with_random_source(random);

    let app = create_router(AppState::new(engine, config.request_timeout()));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(address = %addr, "Server running");

    axum::serve(listener, app).await?;

    Ok(())
}
