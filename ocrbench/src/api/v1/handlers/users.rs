//! Placeholder user endpoints. Nothing is persisted; responses echo the
//! request back.

use crate::api::extractors::{AppPath, AppQuery};
use crate::api::v1::dto::{CreateUserQuery, UpdateUserQuery, UpdateUserResponse, UserResponse};
use crate::api::v1::response::{ApiError, ApiResponse};

const CREATED_USER_ID: i64 = 42;
const SAMPLE_NAME: &str = "Milton";
const SAMPLE_EMAIL: &str = "milton@example.com";
const UNCHANGED: &str = "unchanged";

/// `POST /api/v1/users`
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "users",
    operation_id = "users.create",
    params(CreateUserQuery),
    responses(
        (status = 200, description = "User created", body = UserResponse),
        (status = 400, description = "Missing parameters", body = ApiError),
        (status = 401, description = "Missing or invalid token", body = ApiError),
    )
)]
pub async fn create_user(AppQuery(query): AppQuery<CreateUserQuery>) -> ApiResponse<UserResponse> {
    ApiResponse::success(UserResponse {
        id: CREATED_USER_ID,
        name: query.name,
        email: query.email,
    })
}

/// `GET /api/v1/users/{userId}`
#[utoipa::path(
    get,
    path = "/api/v1/users/{userId}",
    tag = "users",
    operation_id = "users.get",
    params(("userId" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 400, description = "User ID is not an integer", body = ApiError),
        (status = 401, description = "Missing or invalid token", body = ApiError),
    )
)]
pub async fn get_user(AppPath(id): AppPath<i64>) -> ApiResponse<UserResponse> {
    ApiResponse::success(UserResponse {
        id,
        name: SAMPLE_NAME.to_string(),
        email: SAMPLE_EMAIL.to_string(),
    })
}

/// `PUT /api/v1/users/{userId}`
#[utoipa::path(
    put,
    path = "/api/v1/users/{userId}",
    tag = "users",
    operation_id = "users.update",
    params(("userId" = i64, Path, description = "User ID"), UpdateUserQuery),
    responses(
        (status = 200, description = "User updated", body = UpdateUserResponse),
        (status = 400, description = "User ID is not an integer", body = ApiError),
        (status = 401, description = "Missing or invalid token", body = ApiError),
    )
)]
pub async fn update_user(
    AppPath(id): AppPath<i64>,
    AppQuery(query): AppQuery<UpdateUserQuery>,
) -> ApiResponse<UpdateUserResponse> {
    let name = query
        .name
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| UNCHANGED.to_string());

    ApiResponse::success(UpdateUserResponse {
        id,
        updated: true,
        name,
    })
}
