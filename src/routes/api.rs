use crate::{handlers::{diagnostics, text_listen, text_read, text_update}, routes::auth_middleware::auth_middleware, state::AppState};
use axum::{routing::{get, post}, Router, middleware};

/// Create API routes
pub fn create_api_routes(state: AppState) -> Router {
    Router::<AppState>::new()
        .route("/v1/text", get(text_read))
        .route("/v1/text/update", post(text_update))
        .route("/v1/text/listen", post(text_listen))
        .route("/v1/diagnostics", get(diagnostics))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware)) // Applies to all routes added above
        .with_state(state)
}
