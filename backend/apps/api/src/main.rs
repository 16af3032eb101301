//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use attack::{
    AttackAppState, AttackConfig, MAX_QUBITS, RetryingBackend, StabilizerBackend,
    attack_router_with_state,
};
use axum::{
    Router, http,
    http::{Method, header},
};
use platform::config::EnvReader;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

const DEFAULT_FRONTEND_ORIGINS: &[&str] = &["http://localhost:3000", "http://127.0.0.1:3000"];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,attack=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let env = EnvReader::process();

    // Attack configuration
    let preset = if cfg!(debug_assertions) {
        AttackConfig::development()
    } else {
        AttackConfig::default()
    };
    let attack_config = preset.with_overrides(&env)?;

    tracing::info!(
        shots = attack_config.shots,
        attempt_policy = ?attack_config.attempt_policy,
        decode_failure = ?attack_config.decode_failure,
        backend_failure = ?attack_config.backend_failure,
        retry = ?attack_config.retry,
        "Attack configuration loaded"
    );

    let backend = RetryingBackend::new(
        StabilizerBackend::new(MAX_QUBITS, attack_config.simulator_seed),
        attack_config.retry,
    );
    let retention = attack_config.run_retention;
    let state = AttackAppState::new(backend, attack_config);

    // Periodic cleanup: drop finished runs past their retention
    let registry = state.registry.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(retention.max(std::time::Duration::from_secs(1)));
        loop {
            interval.tick().await;
            let purged = registry.purge_finished(retention);
            if purged > 0 {
                tracing::info!(runs_purged = purged, "Run cleanup completed");
            }
        }
    });

    // CORS configuration
    let frontend_origins = env.list("FRONTEND_ORIGINS").unwrap_or_else(|| {
        DEFAULT_FRONTEND_ORIGINS
            .iter()
            .map(|origin| origin.to_string())
            .collect()
    });

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([header::CONTENT_TYPE, header::ACCEPT]))
        .allow_credentials(true);

    // Build router
    let registry = state.registry.clone();
    let app = Router::new()
        .merge(attack_router_with_state(state))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr: SocketAddr = env
        .parse::<SocketAddr>("BIND_ADDR")?
        .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 8000)));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %e, "Failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
            tracing::info!(active_runs = registry.active_count(), "Shutting down");
            registry.cancel_all();
        })
        .await?;

    Ok(())
}
