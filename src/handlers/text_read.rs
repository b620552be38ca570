use axum::{extract::State, Json};
use crate::{models::TextDocumentResponse, state::AppState};

/// Current text and signature
pub async fn text_read(State(state): State<AppState>) -> Json<TextDocumentResponse> {
    Json(TextDocumentResponse::from(&state.store.read()))
}
