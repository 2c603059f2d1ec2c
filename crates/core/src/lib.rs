//! # Clinic Core
//!
//! Core business logic for the clinic service.
//!
//! This crate contains pure data operations:
//! - Patients, appointments, messages and medical records held in per-kind stores
//! - Identifier allocation that never reuses a value
//! - Input and referential validation ahead of every mutation
//! - JSON snapshots of the whole registry
//!
//! **No API concerns**: HTTP/gRPC servers and wire handling belong in `api-grpc`,
//! `api-rest`, or `api-shared`.

pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod model;
pub mod service;
pub mod snapshot;
pub mod store;
pub mod validation;
pub mod wire;

// Use the shared api-shared crate for wire types.
pub use api_shared::pb;

pub use config::CoreConfig;
pub use error::{ClinicError, ClinicResult, SnapshotError, SnapshotResult};
pub use ids::{EntityKind, IdAllocator};
pub use model::{Appointment, MedicalRecord, Message, MultiMediaContent, Patient};
pub use service::ClinicService;
pub use snapshot::Snapshot;
pub use validation::NonEmptyText;
