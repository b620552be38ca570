use crate::{
    models::{ErrorResponse, TextUpdateRequest, TextUpdateResponse},
    state::AppState,
    store::{Identity, StoreError},
};
use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use tracing::info;

/// Replace the shared text, waking every parked listener
pub async fn text_update(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(request): Json<TextUpdateRequest>,
) -> Result<(StatusCode, Json<TextUpdateResponse>), (StatusCode, Json<ErrorResponse>)> {

    match state.store.write(&identity, request.body) {
        Ok(ack) => {
            info!(
                "Text updated by {} (sig {}, {} delivered, {} skipped)",
                identity, ack.signature, ack.delivered, ack.skipped
            );
            Ok((
                StatusCode::OK,
                Json(TextUpdateResponse {
                    status: "ok".to_string(),
                    sig: ack.signature,
                    delivered: ack.delivered as u32,
                    skipped: ack.skipped as u32,
                }),
            ))
        }
        Err(e @ StoreError::LockDenied) => {
            Err(ErrorResponse::reply(StatusCode::CONFLICT, e.to_string()))
        }
    }
}
