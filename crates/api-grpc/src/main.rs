//! Standalone gRPC server binary.
//!
//! Useful when only the gRPC API is wanted. State lives in memory for the life of the process;
//! the workspace's main `clinic-run` binary runs gRPC and REST together and is the one that
//! loads and saves snapshots.

use std::net::SocketAddr;
use std::sync::Arc;
use tonic::transport::Server;
use tonic_reflection::server::Builder;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_grpc::{pb::clinic_server::ClinicServer, ClinicGrpc};
use api_shared::FILE_DESCRIPTOR_SET;
use clinic_core::{ClinicService, CoreConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_grpc=info".parse()?)
                .add_directive("clinic_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr: SocketAddr = std::env::var("CLINIC_GRPC_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:50051".into())
        .parse()?;

    let cfg = Arc::new(CoreConfig::from_env_values(
        None,
        std::env::var("CLINIC_SYSTEM_SENDER_ID").ok(),
    )?);
    let clinic_service = ClinicService::new(cfg);

    tracing::info!("-- Starting clinic gRPC on {}", addr);

    let mut server_builder =
        Server::builder().add_service(ClinicServer::new(ClinicGrpc::new(clinic_service)));

    if std::env::var("CLINIC_ENABLE_REFLECTION").unwrap_or_else(|_| "false".to_string()) == "true" {
        let reflection_service = Builder::configure()
            .register_encoded_file_descriptor_set(FILE_DESCRIPTOR_SET)
            .build_v1()?;
        server_builder = server_builder.add_service(reflection_service);
        tracing::info!("gRPC server reflection enabled");
    } else {
        tracing::info!("gRPC server reflection disabled");
    }

    server_builder.serve(addr).await?;

    Ok(())
}
