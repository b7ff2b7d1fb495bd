use axum::{
    body::Body,
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::error::AppError;

/// HTTP header carrying the caller's user id
pub const USER_ID_HEADER: &str = "x-user-id";

/// Extension type for the authenticated caller
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CurrentUser(pub Uuid);

impl std::fmt::Display for CurrentUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn user_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| Uuid::parse_str(s.trim()).ok())
}

/// Middleware that resolves the current user from the `x-user-id` header and
/// stores it in the request extensions.
///
/// Requests without a valid user id are rejected with 401.
pub async fn current_user_middleware(mut request: Request, next: Next) -> Response {
    let Some(user_id) = user_id_from_headers(request.headers()) else {
        tracing::warn!(uri = %request.uri(), "Rejected request without a valid user id");
        return AppError::Unauthorized(format!("missing or invalid {} header", USER_ID_HEADER))
            .into_response();
    };

    request.extensions_mut().insert(CurrentUser(user_id));
    next.run(request).await
}

/// Creates the tracing span for an HTTP request, tagged with the caller
pub fn make_span_with_user(request: &Request<Body>) -> tracing::Span {
    let user_id = user_id_from_headers(request.headers())
        .map(|id| id.to_string())
        .unwrap_or_else(|| "anonymous".to_string());

    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        user_id = %user_id,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_user_id_parsed_from_header() {
        let user_id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_ID_HEADER,
            HeaderValue::from_str(&user_id.to_string()).unwrap(),
        );

        assert_eq!(user_id_from_headers(&headers), Some(user_id));
    }

    #[test]
    fn test_malformed_user_id_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_static("player-one"));

        assert_eq!(user_id_from_headers(&headers), None);
        assert_eq!(user_id_from_headers(&HeaderMap::new()), None);
    }
}
