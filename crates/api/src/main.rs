use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clinica_api::background;
use clinica_api::cache::ContentCache;
use clinica_api::config::ServerConfig;
use clinica_api::router::build_app_router;
use clinica_api::state::AppState;
use clinica_db::DbPool;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = config.port,
        storage = config.storage.backend.as_str(),
        "Configuration loaded",
    );

    let pool = connect_database().await;
    let storage = clinica_storage::build_store(&config.storage)
        .await
        .expect("Failed to initialise object storage");

    let cancel = CancellationToken::new();
    let cleanup = tokio::spawn(background::session_cleanup::run(pool.clone(), cancel.clone()));

    let content = ContentCache::new(Duration::from_secs(config.content_cache_ttl_secs));
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        storage,
        content: Arc::new(content),
    };
    let app = build_app_router(state, &config);

    let host = config.host.parse().expect("HOST must be an IP address");
    let addr = SocketAddr::new(host, config.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("Failed to bind {addr}: {e}"));
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    cancel.cancel();
    let grace = Duration::from_secs(config.shutdown_timeout_secs);
    if tokio::time::timeout(grace, cleanup).await.is_err() {
        tracing::warn!(grace_secs = config.shutdown_timeout_secs, "Session cleanup did not stop in time");
    }
    tracing::info!("Shutdown complete");
}

/// Connect to `DATABASE_URL`, check it answers and bring the schema up to date.
async fn connect_database() -> DbPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = clinica_db::create_pool(&url)
        .await
        .expect("Failed to connect to database");
    clinica_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    clinica_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database ready");
    pool
}

/// Human-readable logs by default, JSON lines when `LOG_FORMAT=json`.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "clinica_api=debug,clinica_storage=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    if std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")) {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Resolve on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Ctrl-C handler failed");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "SIGTERM handler failed");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Ctrl-C received, draining connections"),
        () = terminate => tracing::info!("SIGTERM received, draining connections"),
    }
}
