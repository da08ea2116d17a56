use axum::{extract::State, http::StatusCode, Json};

use crate::{
    extract::{ApiPath, ScopedJson},
    routes::models::{ProductDetail, ProductPatchRequest, ProductRequest, ProductSummary},
    services::product as product_service,
    util::AuthUser,
    ApiError, AppState,
};

#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Products",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Products owned by the current user, newest first", body = [ProductSummary]),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 500, description = "Failed to fetch products", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_products(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<ProductSummary>>, ApiError> {
    let products = product_service::list_products(state.db_pool(), user.id).await?;
    Ok(Json(products))
}

#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Products",
    security(("bearerAuth" = [])),
    request_body = ProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductDetail),
        (status = 400, description = "Invalid product payload", body = crate::error::ErrorResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 500, description = "Failed to create product", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_product(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ScopedJson(req): ScopedJson<ProductRequest>,
) -> Result<(StatusCode, Json<ProductDetail>), ApiError> {
    let product = product_service::create_product(state.db_pool(), user.id, req)
        .await
        .map_err(|e| {
            tracing::warn!(user_id = user.id, "failed to create product: {}", e);
            ApiError::from(e)
        })?;

    Ok((StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    get,
    path = "/api/products/{product_id}",
    tag = "Products",
    security(("bearerAuth" = [])),
    params(
        ("product_id" = i64, Path, description = "Product identifier")
    ),
    responses(
        (status = 200, description = "Product fetched", body = ProductDetail),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Product not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_product(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiPath(product_id): ApiPath<i64>,
) -> Result<Json<ProductDetail>, ApiError> {
    let product = product_service::get_product(state.db_pool(), user.id, product_id).await?;
    Ok(Json(product))
}

#[utoipa::path(
    put,
    path = "/api/products/{product_id}",
    tag = "Products",
    security(("bearerAuth" = [])),
    params(
        ("product_id" = i64, Path, description = "Product identifier")
    ),
    request_body = ProductRequest,
    responses(
        (status = 200, description = "Product replaced", body = ProductDetail),
        (status = 400, description = "Invalid product payload", body = crate::error::ErrorResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Product not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn replace_product(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiPath(product_id): ApiPath<i64>,
    ScopedJson(req): ScopedJson<ProductRequest>,
) -> Result<Json<ProductDetail>, ApiError> {
    let product = product_service::replace_product(state.db_pool(), user.id, product_id, req)
        .await
        .map_err(|e| {
            tracing::warn!(user_id = user.id, product_id, "failed to replace product: {}", e);
            ApiError::from(e)
        })?;

    Ok(Json(product))
}

#[utoipa::path(
    patch,
    path = "/api/products/{product_id}",
    tag = "Products",
    security(("bearerAuth" = [])),
    params(
        ("product_id" = i64, Path, description = "Product identifier")
    ),
    request_body = ProductPatchRequest,
    responses(
        (status = 200, description = "Product updated", body = ProductDetail),
        (status = 400, description = "Invalid product payload", body = crate::error::ErrorResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Product not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_product(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiPath(product_id): ApiPath<i64>,
    ScopedJson(req): ScopedJson<ProductPatchRequest>,
) -> Result<Json<ProductDetail>, ApiError> {
    let product = product_service::update_product(state.db_pool(), user.id, product_id, req)
        .await
        .map_err(|e| {
            tracing::warn!(user_id = user.id, product_id, "failed to update product: {}", e);
            ApiError::from(e)
        })?;

    Ok(Json(product))
}

#[utoipa::path(
    delete,
    path = "/api/products/{product_id}",
    tag = "Products",
    security(("bearerAuth" = [])),
    params(
        ("product_id" = i64, Path, description = "Product identifier")
    ),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Product not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_product(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiPath(product_id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    product_service::delete_product(state.db_pool(), user.id, product_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
