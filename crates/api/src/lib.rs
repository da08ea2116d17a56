mod error;
mod extract;
mod middleware;
mod state;
mod util;

pub mod docs;
pub mod routes;
pub mod services;

pub use error::{ApiError, ErrorResponse};
pub use state::AppState;
pub use util::{require_token, AuthUser};

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/api-docs/openapi.json", get(docs::openapi_json))
        // User routes
        .route("/api/user/create", post(routes::users::create_user))
        .route("/api/user/token", post(routes::users::create_token))
        .route(
            "/api/user/me",
            get(routes::users::get_current_user)
                .put(routes::users::update_current_user)
                .patch(routes::users::update_current_user),
        )
        // Product routes
        .route(
            "/api/products",
            get(routes::products::list_products).post(routes::products::create_product),
        )
        .route(
            "/api/products/:product_id",
            get(routes::products::get_product)
                .put(routes::products::replace_product)
                .patch(routes::products::update_product)
                .delete(routes::products::delete_product),
        )
        // Tag routes
        .route(
            "/api/tags",
            get(routes::tags::list_tags).post(routes::tags::create_tag),
        )
        .route(
            "/api/tags/:tag_id",
            get(routes::tags::get_tag)
                .put(routes::tags::replace_tag)
                .patch(routes::tags::update_tag)
                .delete(routes::tags::delete_tag),
        )
        .with_state(state)
        .layer(axum::middleware::from_fn(middleware::logging_middleware))
        .layer(middleware::trace_layer())
        .layer(cors_layer())
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
}
