use storefront_auth::{Authenticator, ProfileUpdate, Registration};
use tracing::info;

use super::error::ServiceError;
use crate::routes::models::{
    CreateUserRequest, TokenRequest, TokenResponse, UpdateUserRequest, UserResponse,
};

pub async fn register_user(
    authenticator: &Authenticator,
    req: CreateUserRequest,
) -> Result<UserResponse, ServiceError> {
    let registration = Registration {
        email: req.email,
        username: req.username,
        name: req.name,
        password: req.password,
    };

    let user = authenticator.register(&registration).await?;
    info!(user_id = user.id, "registered user");
    Ok(user.into())
}

pub async fn issue_token(
    authenticator: &Authenticator,
    req: TokenRequest,
) -> Result<TokenResponse, ServiceError> {
    let session = authenticator
        .issue_token(&req.username, &req.password)
        .await?;

    Ok(TokenResponse {
        token: session.token,
    })
}

pub async fn update_current_user(
    authenticator: &Authenticator,
    user_id: i64,
    req: UpdateUserRequest,
) -> Result<UserResponse, ServiceError> {
    let update = ProfileUpdate {
        email: req.email,
        username: req.username,
        name: req.name,
        password: req.password,
    };

    let user = authenticator.update_profile(user_id, &update).await?;
    Ok(user.into())
}
