use axum::Json;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health::health_check,
        crate::routes::users::create_user,
        crate::routes::users::create_token,
        crate::routes::users::get_current_user,
        crate::routes::users::update_current_user,
        crate::routes::products::list_products,
        crate::routes::products::create_product,
        crate::routes::products::get_product,
        crate::routes::products::replace_product,
        crate::routes::products::update_product,
        crate::routes::products::delete_product,
        crate::routes::tags::list_tags,
        crate::routes::tags::create_tag,
        crate::routes::tags::get_tag,
        crate::routes::tags::replace_tag,
        crate::routes::tags::update_tag,
        crate::routes::tags::delete_tag
    ),
    components(
        schemas(
            crate::error::ErrorResponse,
            crate::routes::health::HealthResponse,
            crate::routes::models::UserResponse,
            crate::routes::models::CreateUserRequest,
            crate::routes::models::UpdateUserRequest,
            crate::routes::models::TokenRequest,
            crate::routes::models::TokenResponse,
            crate::routes::models::TagResponse,
            crate::routes::models::TagRequest,
            crate::routes::models::TagPatchRequest,
            crate::routes::models::ProductSummary,
            crate::routes::models::ProductDetail,
            crate::routes::models::ProductRequest,
            crate::routes::models::ProductPatchRequest
        )
    ),
    tags(
        (name = "Health", description = "Service health endpoints"),
        (name = "Users", description = "Registration, tokens and the current user"),
        (name = "Products", description = "Products owned by the current user"),
        (name = "Tags", description = "Tags owned by the current user")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        let schemes = &mut components.security_schemes;

        let mut scheme = SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer));
        if let SecurityScheme::Http(http) = &mut scheme {
            http.bearer_format = Some("Token".to_string());
        }

        schemes.insert("bearerAuth".to_string(), scheme);
    }
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
