use sqlx::SqlitePool;
use storefront_database::{NewProduct, ProductChanges, ProductRepository};

use super::error::ServiceError;
use crate::routes::models::{
    ProductDetail, ProductPatchRequest, ProductRequest, ProductSummary, TagRequest,
};

fn tag_names(tags: Vec<TagRequest>) -> Vec<String> {
    tags.into_iter().map(|tag| tag.name).collect()
}

pub async fn list_products(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<ProductSummary>, ServiceError> {
    let products = ProductRepository::new(pool.clone())
        .list_for_owner(user_id)
        .await?;

    Ok(products.into_iter().map(ProductSummary::from).collect())
}

pub async fn create_product(
    pool: &SqlitePool,
    user_id: i64,
    req: ProductRequest,
) -> Result<ProductDetail, ServiceError> {
    let product = NewProduct {
        name: req.name,
        price: req.price,
        description: req.description.unwrap_or_default(),
        tags: req.tags.map(tag_names).unwrap_or_default(),
    };

    let created = ProductRepository::new(pool.clone())
        .create(user_id, &product)
        .await?;

    Ok(created.into())
}

pub async fn get_product(
    pool: &SqlitePool,
    user_id: i64,
    product_id: i64,
) -> Result<ProductDetail, ServiceError> {
    let product = ProductRepository::new(pool.clone())
        .find_for_owner(user_id, product_id)
        .await?
        .ok_or(ServiceError::NotFound)?;

    Ok(product.into())
}

/// PUT: name and price are required, everything else behaves like PATCH.
pub async fn replace_product(
    pool: &SqlitePool,
    user_id: i64,
    product_id: i64,
    req: ProductRequest,
) -> Result<ProductDetail, ServiceError> {
    let changes = ProductChanges {
        name: Some(req.name),
        price: Some(req.price),
        description: req.description,
        tags: req.tags.map(tag_names),
    };

    apply_changes(pool, user_id, product_id, &changes).await
}

pub async fn update_product(
    pool: &SqlitePool,
    user_id: i64,
    product_id: i64,
    req: ProductPatchRequest,
) -> Result<ProductDetail, ServiceError> {
    let changes = ProductChanges {
        name: req.name,
        price: req.price,
        description: req.description,
        tags: req.tags.map(tag_names),
    };

    apply_changes(pool, user_id, product_id, &changes).await
}

async fn apply_changes(
    pool: &SqlitePool,
    user_id: i64,
    product_id: i64,
    changes: &ProductChanges,
) -> Result<ProductDetail, ServiceError> {
    let updated = ProductRepository::new(pool.clone())
        .update(user_id, product_id, changes)
        .await?;

    Ok(updated.into())
}

pub async fn delete_product(
    pool: &SqlitePool,
    user_id: i64,
    product_id: i64,
) -> Result<(), ServiceError> {
    ProductRepository::new(pool.clone())
        .delete(user_id, product_id)
        .await?;
    Ok(())
}
