use crate::{
    models::{ErrorResponse, TextListenRequest, TextListenResponse},
    state::AppState,
    store::{ChangeWait, Identity, Notification},
};
use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use tokio::sync::oneshot;
use tracing::{debug, error};
use uuid::Uuid;

/// Long-poll for the next change to the text.
///
/// Dropping this future (client disconnect or timeout) drops the receiver,
/// and the store discards the dead listener on its next registration or
/// fan-out.
pub async fn text_listen(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(request): Json<TextListenRequest>,
) -> Result<Json<TextListenResponse>, (StatusCode, Json<ErrorResponse>)> {

    let listen_id = Uuid::new_v4();
    let (tx, rx) = oneshot::channel::<Notification>();

    match state.store.await_change(&identity, request.sig.as_deref(), tx) {
        ChangeWait::Immediate => debug!("Listener {} for {} is behind, answering now", listen_id, identity),
        ChangeWait::Pending => debug!("Listener {} for {} parked", listen_id, identity),
    }

    let received = match state.config.listen_timeout() {
        Some(limit) => match tokio::time::timeout(limit, rx).await {
            Ok(received) => received,
            Err(_) => {
                debug!("Listener {} for {} timed out after {:?}", listen_id, identity, limit);
                return Ok(Json(TextListenResponse::timeout()));
            }
        },
        None => rx.await,
    };

    let notification = match received {
        Ok(notification) => notification,
        Err(_) => {
            error!("Listener {} for {} was dropped without a delivery", listen_id, identity);
            return Err(ErrorResponse::reply(
                StatusCode::SERVICE_UNAVAILABLE,
                "Listener was released without an update",
            ));
        }
    };

    // The writer already has what it wrote
    if notification.is_from(&identity) {
        return Ok(Json(TextListenResponse::ack()));
    }

    Ok(Json(TextListenResponse::document(&notification.document)))
}
