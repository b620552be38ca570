mod auth;
mod config;
mod docs;
mod handlers;
mod models;
mod routes;
mod services;
mod state;
mod store;

use config::Config;
use routes::create_app;
use state::AppState;
use tracing::{info, error, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use std::panic;

#[tokio::main(flavor = "current_thread")]
async fn main() {

    // Set panic hook for better error messages
    panic::set_hook(Box::new(|info| {
        eprintln!("PANIC: {info}");
    }));

    // Load configuration first so its log level can seed the filter
    let loaded = Config::load();
    let default_filter = match &loaded {
        Ok(config) => config.log_filter(),
        Err(_) => Config::default().log_filter(),
    };

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .init();

    info!("Starting server...");

    let config = match loaded {
        Ok(config) => {
            info!("✅ Configuration loaded successfully");
            config
        }
        Err(e) => {
            error!("❌ Failed to load configuration: {}", e);
            warn!("Using default configuration");
            Config::default()
        }
    };

    if config.auth_jwt_secret.is_none() {
        warn!("No AUTH_JWT_SECRET configured - every /api request will be refused");
    }

    let address = config.server_address();
    let lease_ttl = config.lease_ttl();
    let listen_timeout = config.listen_timeout();

    let state = AppState::new(config);
    let app_routes = create_app(state);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .unwrap_or_else(|_| panic!("Failed to bind to {}", address));

    info!("🚀 Server running on http://{}", address);
    info!("✍️  Writer lease: {:?}, listen timeout: {:?}", lease_ttl, listen_timeout);
    info!("📚 Swagger UI available at http://{}/swagger", address);

    axum::serve(listener, app_routes)
        .await
        .expect("Server failed to start");
}
