use axum::http::StatusCode;

/// Unknown paths. Registered explicitly so the CORS layer wraps it.
pub async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}
