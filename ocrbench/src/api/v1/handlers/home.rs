use axum::Extension;
use serde::Serialize;

use crate::api::v1::response::{ApiError, ApiResponse};
use crate::auth::AuthenticatedUser;

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct WelcomeResponse {
    pub message: String,
    pub user: AuthenticatedUser,
}

/// `GET /api/v1`
#[utoipa::path(
    get,
    path = "/api/v1",
    tag = "home",
    operation_id = "home.welcome",
    responses(
        (status = 200, description = "Greeting for the authenticated caller", body = WelcomeResponse),
        (status = 401, description = "Missing or invalid token", body = ApiError),
    )
)]
pub async fn welcome(Extension(user): Extension<AuthenticatedUser>) -> ApiResponse<WelcomeResponse> {
    ApiResponse::success(WelcomeResponse {
        message: "Welcome, authenticated user!".to_string(),
        user,
    })
}
