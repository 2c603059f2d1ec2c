//! Build script for the `api-shared` crate.
//!
//! ## Purpose
//! Generates Rust protobuf types from `clinic.proto` and emits a file-descriptor set.
//!
//! ## Intended use
//! The generated types are shared by both gRPC and REST APIs. The descriptor set is used for gRPC
//! reflection. A vendored `protoc` is used unless `PROTOC` is already set.

/// Identifiers that REST takes from the URL path, so JSON bodies may omit them.
const PATH_SUPPLIED_FIELDS: &[&str] = &[
    ".clinic.v1.UpdatePatientReq.id",
    ".clinic.v1.UpdateAppointmentReq.id",
    ".clinic.v1.UpdateMessageReq.id",
    ".clinic.v1.UpdateMedicalRecordReq.id",
    ".clinic.v1.SendReminderReq.patient_id",
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let proto_file = std::path::Path::new(manifest_dir).join("clinic.proto");
    let proto_include_root = std::path::Path::new(manifest_dir);

    if std::env::var_os("PROTOC").is_none() {
        std::env::set_var("PROTOC", protoc_bin_vendored::protoc_bin_path()?);
    }

    println!("cargo:rerun-if-changed={}", proto_file.display());
    let builder = tonic_build::configure()
        .build_server(true)
        .build_client(false)
        .type_attribute(
            ".",
            "#[derive(serde::Serialize, serde::Deserialize, utoipa::ToSchema)]",
        )
        .file_descriptor_set_path(
            std::path::Path::new(&std::env::var("OUT_DIR")?).join("proto_descriptor.bin"),
        );

    PATH_SUPPLIED_FIELDS
        .iter()
        .fold(builder, |builder, field| {
            builder.field_attribute(*field, "#[serde(default)]")
        })
        .compile_protos(std::slice::from_ref(&proto_file), &[proto_include_root])?;

    Ok(())
}
