//! Request extractors that answer with [`ApiError`] bodies.

use axum::async_trait;
use axum::extract::{FromRequest, FromRequestParts, Request};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::ApiError;

/// Fields that name the owning user. Ownership comes from the token only.
const OWNER_FIELDS: [&str; 2] = ["owner", "user"];

/// `axum::Json` with malformed or mistyped bodies reported as 400.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// `axum::extract::Path` with unparsable ids reported as 404.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// JSON body for owner-scoped resources. Any `owner` or `user` key is
/// rejected with 400, whatever its value.
pub struct ScopedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ScopedJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let ApiJson(value) = ApiJson::<Value>::from_request(req, state).await?;
        reject_owner_fields(&value)?;

        serde_json::from_value(value)
            .map(Self)
            .map_err(|err| ApiError::bad_request(err.to_string()))
    }
}

fn reject_owner_fields(value: &Value) -> Result<(), ApiError> {
    let Some(object) = value.as_object() else {
        return Ok(());
    };

    match OWNER_FIELDS.iter().find(|field| object.contains_key(**field)) {
        Some(field) => Err(ApiError::bad_request(format!(
            "{field}: the owner of a resource cannot be set or changed"
        ))),
        None => Ok(()),
    }
}
