//! # API gRPC
//!
//! gRPC server implementation for the clinic service.
//!
//! Handles:
//! - The `clinic.v1.Clinic` service, backed by `clinic-core`
//! - Mapping clinic errors onto gRPC status codes
//!
//! Uses `api-shared` for the wire messages and the generated server trait.

#![warn(rust_2018_idioms)]

pub use api_shared::FILE_DESCRIPTOR_SET;
pub use service::{pb, status_from_error, ClinicGrpc};

pub mod service;
