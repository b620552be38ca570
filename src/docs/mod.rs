use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use crate::models::*;

/// Registers the bearer JWT scheme the text endpoints refer to
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
#[allow(dead_code)]
pub async fn health_check_doc() {}

/// Readiness check endpoint
#[utoipa::path(
    get,
    path = "/ready",
    responses(
        (status = 200, description = "Service is ready", body = HealthResponse)
    )
)]
#[allow(dead_code)]
pub async fn ready_check_doc() {}

/// Read the shared text
#[utoipa::path(
    get,
    path = "/api/v1/text",
    responses(
        (status = 200, description = "Current text and signature", body = TextDocumentResponse),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer" = []))
)]
#[allow(dead_code)]
pub async fn text_read_doc() {}

/// Replace the shared text
#[utoipa::path(
    post,
    path = "/api/v1/text/update",
    request_body = TextUpdateRequest,
    responses(
        (status = 200, description = "Text replaced and listeners notified", body = TextUpdateResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 409, description = "Another client holds the writer lease", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[allow(dead_code)]
pub async fn text_update_doc() {}

/// Wait for the next change to the shared text
#[utoipa::path(
    post,
    path = "/api/v1/text/listen",
    request_body = TextListenRequest,
    responses(
        (status = 200, description = "New text, an acknowledgement for the writer, or a timeout", body = TextListenResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 503, description = "Listener released without an update", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[allow(dead_code)]
pub async fn text_listen_doc() {}

/// Store and system statistics
#[utoipa::path(
    get,
    path = "/api/v1/diagnostics",
    responses(
        (status = 200, description = "Diagnostics", body = DiagnosticsResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[allow(dead_code)]
pub async fn diagnostics_doc() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check_doc,
        ready_check_doc,
        text_read_doc,
        text_update_doc,
        text_listen_doc,
        diagnostics_doc,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorResponse,
            TextDocumentResponse,
            TextUpdateRequest,
            TextUpdateResponse,
            TextListenRequest,
            TextListenResponse,
            ListenOutcome,
            DiagnosticsResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "api", description = "Shared text endpoints")
    )
)]
pub struct ApiDoc;
