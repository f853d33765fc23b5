//! Binary entry point: configuration, store selection, and serving.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use roster_core::{
    mailer::LogMailer,
    store::{MemoryStore, PostgresStore, UserStore},
};
use roster_server::{
    infra::{
        app_state::AppState,
        config::{Cli, Config},
    },
    routes,
    users::auth::TokenKeys,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_cli(Cli::parse())?;

    let store: Arc<dyn UserStore> = match &config.database_url {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(url)
                .await
                .context("connecting to database")?;
            roster_core::MIGRATOR
                .run(&pool)
                .await
                .context("running migrations")?;
            tracing::info!("using postgres store");
            Arc::new(PostgresStore::new(pool))
        }
        None => {
            tracing::warn!(
                "no DATABASE_URL configured; accounts will not survive restart"
            );
            Arc::new(MemoryStore::new())
        }
    };

    let state = AppState::new(
        store,
        Arc::new(LogMailer),
        TokenKeys::new(&config.token_secret),
    );
    let app = routes::create_app(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("binding {}", config.bind))?;
    tracing::info!("listening on {}", config.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutting down");
}
