use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::Response,
};

/// Collapse every error status to 500, as older clients of this API expect.
/// The `{"error": ...}` body is left untouched.
pub async fn legacy_error_status(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;

    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    }

    response
}
