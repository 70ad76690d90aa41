//! # V1 Bearer Token Middleware
//!
//! Protects every v1 route except the public ones (`/health`, `/openapi.json`,
//! `/docs`). Accepted requests carry the [`AuthenticatedUser`] in their
//! extensions; rejected ones get a 401 envelope with `WWW-Authenticate: Bearer`.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::api::state::AppState;
use crate::auth::{bearer_token, AuthenticatedUser};
use crate::error::OcrBenchError;

use super::response::ApiResponse;

pub async fn v1_auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(str::to_owned);

    let verified = match bearer_token(auth_header.as_deref()) {
        Ok(token) => state.verifier.verify(token).await,
        Err(e) => Err(e),
    };

    let user: AuthenticatedUser = match verified {
        Ok(user) => user,
        Err(e) => {
            debug!(error = %e, path = %request.uri().path(), "Rejected request");
            return ApiResponse::<()>::from(OcrBenchError::Auth(e)).into_response();
        }
    };

    request.extensions_mut().insert(user);
    next.run(request).await
}
