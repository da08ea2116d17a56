use axum::{extract::State, http::StatusCode, Json};

use crate::{
    extract::ApiJson,
    routes::models::{
        CreateUserRequest, TokenRequest, TokenResponse, UpdateUserRequest, UserResponse,
    },
    services::user as user_service,
    util::AuthUser,
    ApiError, AppState,
};

#[utoipa::path(
    post,
    path = "/api/user/create",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Invalid or duplicate registration", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user = user_service::register_user(state.authenticator(), req).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    post,
    path = "/api/user/token",
    tag = "Users",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Unable to authenticate with provided credentials", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_token(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<TokenRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = user_service::issue_token(state.authenticator(), req).await?;
    Ok(Json(token))
}

#[utoipa::path(
    get,
    path = "/api/user/me",
    tag = "Users",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_current_user(AuthUser(user): AuthUser) -> Json<UserResponse> {
    Json(user.into())
}

#[utoipa::path(
    put,
    path = "/api/user/me",
    tag = "Users",
    security(("bearerAuth" = [])),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Invalid update payload", body = crate::error::ErrorResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_current_user(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(req): ApiJson<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let updated = user_service::update_current_user(state.authenticator(), user.id, req)
        .await
        .map_err(|e| {
            tracing::warn!(user_id = user.id, "failed to update user: {}", e);
            ApiError::from(e)
        })?;

    Ok(Json(updated))
}
