use std::net::SocketAddr;
use std::sync::Arc;
use tonic::transport::Server;
use tonic_reflection::server::Builder;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_grpc::{pb::clinic_server::ClinicServer, ClinicGrpc, FILE_DESCRIPTOR_SET};
use clinic_core::{ClinicService, CoreConfig};

/// Main entry point for the clinic application
///
/// Starts both gRPC and REST servers concurrently over one shared `ClinicService`:
/// - gRPC server on port 50051 (configurable via CLINIC_GRPC_ADDR)
/// - REST server on port 3000 (configurable via CLINIC_REST_ADDR)
///
/// When a snapshot path is configured the service is loaded from it at startup and written
/// back to it on Ctrl-C, and also if either server stops with an error.
///
/// # Environment Variables
/// - `CLINIC_GRPC_ADDR`: gRPC server address (default: "0.0.0.0:50051")
/// - `CLINIC_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `CLINIC_SNAPSHOT_PATH`: JSON snapshot file (optional)
/// - `CLINIC_SYSTEM_SENDER_ID`: Sender id stamped on reminders (default: 0)
/// - `CLINIC_ENABLE_REFLECTION`: Set to "true" to serve gRPC reflection (default: off)
///
/// # Returns
/// * `Ok(())` - If servers start, run, and shut down cleanly
/// * `Err(anyhow::Error)` - If configuration, startup, a server, or the final snapshot fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("clinic_run=info".parse()?)
                .add_directive("clinic_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let grpc_addr: SocketAddr = std::env::var("CLINIC_GRPC_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:50051".into())
        .parse()?;
    let rest_addr = std::env::var("CLINIC_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let cfg = Arc::new(CoreConfig::from_env_values(
        std::env::var("CLINIC_SNAPSHOT_PATH").ok(),
        std::env::var("CLINIC_SYSTEM_SENDER_ID").ok(),
    )?);
    let clinic_service = ClinicService::load(cfg.clone())?;

    tracing::info!("++ Starting clinic gRPC on {}", grpc_addr);
    tracing::info!("++ Starting clinic REST on {}", rest_addr);

    let rest_app = api_rest::router(clinic_service.clone());
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    let rest_server = async move { axum::serve(listener, rest_app).await };

    let mut grpc_builder = Server::builder()
        .add_service(ClinicServer::new(ClinicGrpc::new(clinic_service.clone())));
    if std::env::var("CLINIC_ENABLE_REFLECTION").unwrap_or_else(|_| "false".to_string()) == "true" {
        let reflection_service = Builder::configure()
            .register_encoded_file_descriptor_set(FILE_DESCRIPTOR_SET)
            .build_v1()?;
        grpc_builder = grpc_builder.add_service(reflection_service);
        tracing::info!("gRPC server reflection enabled");
    }
    let grpc_server = grpc_builder.serve(grpc_addr);

    let outcome: anyhow::Result<()> = tokio::select! {
        res = rest_server => res.map_err(anyhow::Error::from),
        res = grpc_server => res.map_err(anyhow::Error::from),
        res = tokio::signal::ctrl_c() => {
            tracing::info!("-- Shutdown requested");
            res.map_err(anyhow::Error::from)
        }
    };

    if let Some(path) = cfg.snapshot_path() {
        clinic_service.save_snapshot(path)?;
    }

    outcome
}
