use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// API response for the health and readiness checks
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub version: String,
    /// Parked long-polls, only reported by the readiness check
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listeners: Option<u32>,
}

impl HealthResponse {
    pub fn ok(message: &str) -> Self {
        Self {
            status: "ok".to_string(),
            message: message.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            listeners: None,
        }
    }
}
