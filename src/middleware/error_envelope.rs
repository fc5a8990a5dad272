use axum::{
    extract::{OriginalUri, Request},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::{ErrorEnvelope, RaisedError};

/// Rewrites every `ApiError` response into the error envelope carrying the request path.
/// Responses without the `RaisedError` marker pass through untouched.
pub async fn normalize_errors(request: Request, next: Next) -> Response {
    let path = request
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.0.path().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let mut response = next.run(request).await;

    match response.extensions_mut().remove::<RaisedError>() {
        Some(raised) => {
            let status = response.status();
            (status, Json(ErrorEnvelope::new(status, raised.message, path))).into_response()
        }
        None => response,
    }
}
