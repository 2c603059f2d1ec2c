use crate::pb::HealthRes;

/// Health check shared by the gRPC and REST APIs.
#[derive(Clone, Debug, Default)]
pub struct HealthService;

impl HealthService {
    /// Creates a new instance of HealthService.
    pub fn new() -> Self {
        Self
    }

    /// Reports the service as alive.
    ///
    /// The clinic keeps everything in memory, so being able to answer is the whole
    /// check.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "Clinic is alive".into(),
        }
    }
}
