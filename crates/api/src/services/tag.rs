use sqlx::SqlitePool;
use storefront_database::{DatabaseError, TagRepository};

use super::error::ServiceError;
use crate::routes::models::{TagPatchRequest, TagRequest, TagResponse};

fn map_tag_error(err: DatabaseError) -> ServiceError {
    match err {
        DatabaseError::Duplicate(_) => {
            ServiceError::bad_request("a tag with this name already exists")
        }
        other => other.into(),
    }
}

pub async fn list_tags(pool: &SqlitePool, user_id: i64) -> Result<Vec<TagResponse>, ServiceError> {
    let tags = TagRepository::new(pool.clone())
        .list_for_owner(user_id)
        .await?;

    Ok(tags.into_iter().map(TagResponse::from).collect())
}

pub async fn create_tag(
    pool: &SqlitePool,
    user_id: i64,
    req: TagRequest,
) -> Result<TagResponse, ServiceError> {
    let tag = TagRepository::new(pool.clone())
        .create(user_id, &req.name)
        .await
        .map_err(map_tag_error)?;

    Ok(tag.into())
}

pub async fn get_tag(
    pool: &SqlitePool,
    user_id: i64,
    tag_id: i64,
) -> Result<TagResponse, ServiceError> {
    let tag = TagRepository::new(pool.clone())
        .find_for_owner(user_id, tag_id)
        .await?
        .ok_or(ServiceError::NotFound)?;

    Ok(tag.into())
}

pub async fn update_tag(
    pool: &SqlitePool,
    user_id: i64,
    tag_id: i64,
    req: TagRequest,
) -> Result<TagResponse, ServiceError> {
    let tag = TagRepository::new(pool.clone())
        .update(user_id, tag_id, &req.name)
        .await
        .map_err(map_tag_error)?;

    Ok(tag.into())
}

/// PATCH: an omitted name leaves the tag untouched.
pub async fn patch_tag(
    pool: &SqlitePool,
    user_id: i64,
    tag_id: i64,
    req: TagPatchRequest,
) -> Result<TagResponse, ServiceError> {
    match req.name {
        Some(name) => update_tag(pool, user_id, tag_id, TagRequest { name }).await,
        None => get_tag(pool, user_id, tag_id).await,
    }
}

pub async fn delete_tag(pool: &SqlitePool, user_id: i64, tag_id: i64) -> Result<(), ServiceError> {
    TagRepository::new(pool.clone())
        .delete(user_id, tag_id)
        .await?;
    Ok(())
}
