//! Inkboard relay server binary.

use inkboard_server::{AppState, ServerConfig, router};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inkboard_server=info,tower_http=info".into()),
        )
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(2);
        }
    };

    let state = Arc::new(AppState::new());
    let app = router(state, config.static_dir.as_deref());

    info!("Inkboard relay server listening on {}", config.addr);
    info!("WebSocket endpoint: ws://{}/ws", config.addr);
    if let Some(dir) = &config.static_dir {
        info!("Serving client assets from {}", dir.display());
    }

    let listener = tokio::net::TcpListener::bind(config.addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
