use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Response for diagnostics information
#[derive(Serialize, Deserialize, ToSchema)]
pub struct DiagnosticsResponse {
    pub n_waiters: u32,
    pub lease_held: bool,
    pub lease_ttl_secs: u64,
    pub signature: String,
    pub body_len: u64,
    pub updated_at: DateTime<Utc>,
    pub cpu_usage: f32,
    pub memory_alloc: u64,
    pub memory_total: u64,
    pub memory_free: u64,
}
