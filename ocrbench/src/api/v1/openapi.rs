use axum::Json;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use super::dto;
use super::handlers;
use super::response;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ocrbench API",
        version = "0.1.0",
        description = "OCR engine comparison service. Everything except health and docs requires a bearer token.",
    ),
    paths(
        handlers::health::health_check,
        handlers::home::welcome,
        handlers::users::create_user,
        handlers::users::get_user,
        handlers::users::update_user,
    ),
    components(schemas(
        response::ErrorCode,
        response::ApiError,
        crate::auth::AuthenticatedUser,
        handlers::health::HealthData,
        handlers::home::WelcomeResponse,
        dto::UserResponse,
        dto::UpdateUserResponse,
    )),
    tags(
        (name = "health", description = "Public health check"),
        (name = "home", description = "Protected landing endpoint"),
        (name = "users", description = "User management placeholders"),
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            utoipa::openapi::security::SecurityScheme::Http(utoipa::openapi::security::Http::new(
                utoipa::openapi::security::HttpAuthScheme::Bearer,
            )),
        );
    }
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn redoc_router<S: Clone + Send + Sync + 'static>() -> axum::Router<S> {
    Redoc::with_url("/docs", ApiDoc::openapi()).into()
}
