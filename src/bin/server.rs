//! Server: reads settings from the environment (and `.env`), connects the gateway,
//! bootstraps tables when enabled, then serves until Ctrl-C / SIGTERM.

use agence_vehicule::{app, ensure_tables, logging, AppState, Database, Settings, SqlxDatabase};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    logging::init_logging();

    let settings = Settings::from_env()?;
    tracing::debug!(?settings, "settings loaded");

    let db = SqlxDatabase::connect(&settings.database).await?;
    tracing::info!("connected to the database");
    if settings.database.auto_migrate {
        ensure_tables(&db).await?;
    }

    let db: Arc<dyn Database> = Arc::new(db);
    let router = app(AppState::new(db.clone()), settings.server.body_limit);

    let listener = TcpListener::bind(settings.server.bind_address()).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    tracing::info!("connection closed");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown requested");
}
