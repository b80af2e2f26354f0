use axum::{Router, middleware::from_fn};
use tokio::signal;
use tracing::info;

use crate::{
    config::Config,
    errors::Result,
    middleware::{csrf::csrf_middleware, request_id::request_id_middleware},
    routes::api_router,
    state::AppState,
};

pub mod config;
pub mod consts;
pub mod errors;
pub mod middleware;
pub mod models;
pub mod outcome;
pub mod readiness;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
pub mod utils;

pub fn app(state: AppState) -> Router {
    api_router(state.clone())
        .layer(from_fn(csrf_middleware))
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

pub async fn start_server(config: Config) -> Result<()> {
    let address = config.address();
    let state = AppState::init(config).await?;

    info!("Starting server");
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("Serving recruiting hub at http://{}", listener.local_addr()?);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => tracing::error!("Failed to listen for SIGTERM: {e}"),
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
