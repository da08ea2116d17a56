use axum::{extract::State, http::StatusCode, Json};

use crate::{
    extract::{ApiPath, ScopedJson},
    routes::models::{TagPatchRequest, TagRequest, TagResponse},
    services::tag as tag_service,
    util::AuthUser,
    ApiError, AppState,
};

#[utoipa::path(
    get,
    path = "/api/tags",
    tag = "Tags",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Tags owned by the current user", body = [TagResponse]),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_tags(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<TagResponse>>, ApiError> {
    let tags = tag_service::list_tags(state.db_pool(), user.id).await?;
    Ok(Json(tags))
}

#[utoipa::path(
    post,
    path = "/api/tags",
    tag = "Tags",
    security(("bearerAuth" = [])),
    request_body = TagRequest,
    responses(
        (status = 201, description = "Tag created", body = TagResponse),
        (status = 400, description = "Invalid or duplicate tag", body = crate::error::ErrorResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_tag(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ScopedJson(req): ScopedJson<TagRequest>,
) -> Result<(StatusCode, Json<TagResponse>), ApiError> {
    let tag = tag_service::create_tag(state.db_pool(), user.id, req).await?;
    Ok((StatusCode::CREATED, Json(tag)))
}

#[utoipa::path(
    get,
    path = "/api/tags/{tag_id}",
    tag = "Tags",
    security(("bearerAuth" = [])),
    params(
        ("tag_id" = i64, Path, description = "Tag identifier")
    ),
    responses(
        (status = 200, description = "Tag fetched", body = TagResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Tag not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_tag(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiPath(tag_id): ApiPath<i64>,
) -> Result<Json<TagResponse>, ApiError> {
    let tag = tag_service::get_tag(state.db_pool(), user.id, tag_id).await?;
    Ok(Json(tag))
}

#[utoipa::path(
    put,
    path = "/api/tags/{tag_id}",
    tag = "Tags",
    security(("bearerAuth" = [])),
    params(
        ("tag_id" = i64, Path, description = "Tag identifier")
    ),
    request_body = TagRequest,
    responses(
        (status = 200, description = "Tag renamed", body = TagResponse),
        (status = 400, description = "Invalid or duplicate tag", body = crate::error::ErrorResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Tag not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn replace_tag(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiPath(tag_id): ApiPath<i64>,
    ScopedJson(req): ScopedJson<TagRequest>,
) -> Result<Json<TagResponse>, ApiError> {
    let tag = tag_service::update_tag(state.db_pool(), user.id, tag_id, req).await?;
    Ok(Json(tag))
}

#[utoipa::path(
    patch,
    path = "/api/tags/{tag_id}",
    tag = "Tags",
    security(("bearerAuth" = [])),
    params(
        ("tag_id" = i64, Path, description = "Tag identifier")
    ),
    request_body = TagPatchRequest,
    responses(
        (status = 200, description = "Tag updated", body = TagResponse),
        (status = 400, description = "Invalid or duplicate tag", body = crate::error::ErrorResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Tag not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_tag(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiPath(tag_id): ApiPath<i64>,
    ScopedJson(req): ScopedJson<TagPatchRequest>,
) -> Result<Json<TagResponse>, ApiError> {
    let tag = tag_service::patch_tag(state.db_pool(), user.id, tag_id, req).await?;
    Ok(Json(tag))
}

#[utoipa::path(
    delete,
    path = "/api/tags/{tag_id}",
    tag = "Tags",
    security(("bearerAuth" = [])),
    params(
        ("tag_id" = i64, Path, description = "Tag identifier")
    ),
    responses(
        (status = 204, description = "Tag deleted and detached from products"),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Tag not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_tag(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiPath(tag_id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    tag_service::delete_tag(state.db_pool(), user.id, tag_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
