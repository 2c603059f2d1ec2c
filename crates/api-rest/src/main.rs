//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server on its own.
//!
//! ## Intended use
//! Useful for development and debugging when you only want the REST server (with
//! OpenAPI/Swagger UI). State lives in memory for the life of the process; the workspace's main
//! `clinic-run` binary runs gRPC and REST together and handles snapshots.

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clinic_core::{ClinicService, CoreConfig};

/// Main entry point for the clinic REST API server
///
/// # Environment Variables
/// - `CLINIC_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `CLINIC_SYSTEM_SENDER_ID`: Sender id stamped on reminders (default: 0)
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configuration is invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?)
                .add_directive("clinic_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("CLINIC_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let cfg = Arc::new(CoreConfig::from_env_values(
        None,
        std::env::var("CLINIC_SYSTEM_SENDER_ID").ok(),
    )?);
    let app = api_rest::router(ClinicService::new(cfg));

    tracing::info!("-- Starting clinic REST API on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
