//! Router assembly and the listening loop.

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::routes;
use crate::service::GameService;

/// Shared state handed to every handler.
pub struct AppState {
    pub service: Arc<GameService>,
}

pub fn router(service: Arc<GameService>) -> Router {
    let state = Arc::new(AppState { service });

    Router::new()
        .route("/health", axum::routing::get(routes::health))
        .nest("/api", routes::api_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Serves until Ctrl-C.
pub async fn serve(bind: &str, service: Arc<GameService>) -> anyhow::Result<()> {
    let app = router(service);
    let listener = TcpListener::bind(bind).await?;
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
