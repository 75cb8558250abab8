//! Daybook Backend
//!
//! A guided journaling service: question templates, captured entries,
//! mood tracking, search, and account export.
//!
//! ## Architecture
//!
//! The backend follows a layered architecture:
//! - Routes: HTTP request handling and routing
//! - Services: domain logic over templates, entries, mood, search, export
//! - Repositories: Data access
//! - Database: PostgreSQL with SQLx

use anyhow::Result;
use daybook_backend::{config::AppConfig, db, routes, state::AppState};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let production = AppConfig::is_production();
    init_tracing(production);

    let config = AppConfig::load()?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        env = if production { "production" } else { "development" },
        "Starting Daybook Backend"
    );

    if production {
        check_production_config(&config)?;
    }

    info!("Connecting to database...");
    let db_pool = db::create_pool(&config.database).await?;

    // Migrations run at startup outside production; deployments apply them
    // as a separate job.
    if !production {
        info!("Running database migrations...");
        db::run_migrations(&db_pool).await?;
    }

    let app = routes::create_router(AppState::new(db_pool, config.clone()));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Env-filtered tracing: JSON output in production, pretty locally
fn init_tracing(production: bool) {
    let default_filter = if production {
        "daybook_backend=info,tower_http=info"
    } else {
        "daybook_backend=debug,tower_http=debug,sqlx=warn"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    let registry = tracing_subscriber::registry().with(env_filter);
    if production {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

/// Refuse to start production on a weak or leftover development secret
fn check_production_config(config: &AppConfig) -> Result<()> {
    if config.jwt.secret.len() < 32 || config.jwt.secret.contains("development") {
        anyhow::bail!("JWT secret must be at least 32 characters and not a development value");
    }
    if config.database.url.contains("localhost") || config.database.url.contains("127.0.0.1") {
        warn!("Database URL points at localhost in production");
    }
    Ok(())
}

/// Resolves when the process receives Ctrl+C or SIGTERM
async fn shutdown_signal() {
    #[cfg(unix)]
    let sigterm = async {
        let mut term = signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler");
        term.recv().await;
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        result = signal::ctrl_c() => {
            result.expect("Ctrl+C handler");
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = sigterm => {
            info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
