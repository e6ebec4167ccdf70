use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use menu_api_server::{
    build_router,
    config::Settings,
    database::{FirestoreStore, MenuRepository},
    services::{MenuService, SessionCache, ViewOptions},
    telemetry::init_telemetry,
    AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load()?;

    // Held until exit so the file writer flushes
    let _log_guard = init_telemetry(&settings.logging);

    info!("Starting menu API server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Serving franchise {} from project {}",
        settings.franchise.id, settings.firestore.project_id
    );

    let store = Arc::new(FirestoreStore::new(&settings.firestore)?);
    let repository = Arc::new(MenuRepository::new(store, settings.franchise.id.clone()));

    let menu_service = Arc::new(MenuService::new(repository));
    let loader = menu_service.start();

    let sessions = SessionCache::new(Duration::from_secs(settings.session.ttl_seconds));
    let cleanup = sessions.spawn_cleanup(Duration::from_secs(
        settings.session.cleanup_interval_seconds.max(1),
    ));

    let app = build_router(AppState {
        menu_service,
        sessions,
        view_options: Arc::new(ViewOptions::from_settings(&settings)),
    });

    let addr = SocketAddr::from((
        settings.server.host.parse::<std::net::IpAddr>()?,
        settings.server.port,
    ));

    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The load may still be in flight if we shut down early
    loader.abort();
    cleanup.abort();
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
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

    info!("Shutdown signal received");
}
