use crate::{auth::auth, models::{DiagnosticsResponse, ErrorResponse}, state::AppState};
use axum::{extract::{State, Extension}, http::StatusCode, Json};
use std::sync::{Mutex, OnceLock};
use sysinfo::System;
use tracing::info;

static SYSTEM_MONITOR: OnceLock<Mutex<System>> = OnceLock::new();

/// Store and process statistics
pub async fn diagnostics(
    State(state): State<AppState>,
    Extension(prpls): Extension<Vec<String>>,
) -> Result<(StatusCode, Json<DiagnosticsResponse>), (StatusCode, Json<ErrorResponse>)> {

    let _ = auth::ensure_role(&prpls, &state.config.admin_role)?;

    let document = state.store.read();
    let n_waiters = state.store.pending_waiters() as u32;
    let lease_held = state.store.writer().is_some();

    // System stats
    let (cpu_usage, memory_alloc, memory_free, memory_total) = {
        let sys_lock = SYSTEM_MONITOR.get_or_init(|| {
            Mutex::new(System::new_all())
        });
        match sys_lock.lock() {
            Ok(mut sys) => {
                sys.refresh_cpu();
                sys.refresh_memory();
                (
                    sys.global_cpu_info().cpu_usage(),
                    sys.used_memory(),
                    sys.free_memory(),
                    sys.total_memory(),
                )
            }
            Err(_) => (0.0, 0, 0, 0)
        }
    };

    info!(
        "Diagnostics: CPU: {:.2}%, Mem: {}/{} MB, Listeners: {}, Lease held: {}",
        cpu_usage,
        memory_alloc / 1024 / 1024,
        memory_total / 1024 / 1024,
        n_waiters,
        lease_held
    );

    Ok((
        StatusCode::OK,
        Json(DiagnosticsResponse {
            n_waiters,
            lease_held,
            lease_ttl_secs: state.store.lease_ttl().as_secs(),
            signature: document.signature,
            body_len: document.body.len() as u64,
            updated_at: document.updated_at,
            cpu_usage,
            memory_alloc,
            memory_total,
            memory_free,
        }),
    ))
}
