//! Owner-scoped product storage and tag reconciliation.

use std::collections::HashMap;

use chrono::Utc;
use sqlx::{FromRow, SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::entities::{
    price_from_cents, price_to_cents, validate_name, NewProduct, Product, ProductChanges, Tag,
};
use crate::repos::TagRepository;
use crate::types::{DatabaseError, DatabaseResult};

#[derive(FromRow)]
struct ProductRow {
    id: i64,
    user_id: i64,
    name: String,
    price_cents: i64,
    description: String,
    created_at: String,
    updated_at: String,
}

impl ProductRow {
    fn into_product(self, tags: Vec<Tag>) -> Product {
        Product {
            id: self.id,
            user_id: self.user_id,
            name: self.name,
            price: price_from_cents(self.price_cents),
            description: self.description,
            tags,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(FromRow)]
struct ProductTagRow {
    product_id: i64,
    id: i64,
    user_id: i64,
    name: String,
}

#[derive(Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Lists the owner's products, newest id first, each with its tags.
    pub async fn list_for_owner(&self, owner_id: i64) -> DatabaseResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, user_id, name, price_cents, description, created_at, updated_at
            FROM products
            WHERE user_id = ?
            ORDER BY id DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        let tag_rows = sqlx::query_as::<_, ProductTagRow>(
            r#"
            SELECT pt.product_id AS product_id, t.id AS id, t.user_id AS user_id, t.name AS name
            FROM product_tags pt
            JOIN tags t ON t.id = pt.tag_id
            JOIN products p ON p.id = pt.product_id
            WHERE p.user_id = ?
            ORDER BY t.name ASC, t.id ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        let mut tags_by_product: HashMap<i64, Vec<Tag>> = HashMap::new();
        for row in tag_rows {
            tags_by_product.entry(row.product_id).or_default().push(Tag {
                id: row.id,
                user_id: row.user_id,
                name: row.name,
            });
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let tags = tags_by_product.remove(&row.id).unwrap_or_default();
                row.into_product(tags)
            })
            .collect())
    }

    pub async fn find_for_owner(&self, owner_id: i64, id: i64) -> DatabaseResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, user_id, name, price_cents, description, created_at, updated_at
            FROM products
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let tags = sqlx::query_as::<_, Tag>(
            r#"
            SELECT t.id, t.user_id, t.name
            FROM tags t
            JOIN product_tags pt ON pt.tag_id = t.id
            WHERE pt.product_id = ?
            ORDER BY t.name ASC, t.id ASC
            "#,
        )
        .bind(row.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(row.into_product(tags)))
    }

    /// Creates a product owned by `owner_id` and attaches the named tags,
    /// creating any the owner does not have yet. Runs in one transaction.
    pub async fn create(&self, owner_id: i64, product: &NewProduct) -> DatabaseResult<Product> {
        let name = validate_name("name", &product.name)?;
        let price_cents = price_to_cents(product.price)?;
        let now = Utc::now().to_rfc3339();

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO products (user_id, name, price_cents, description, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(owner_id)
        .bind(&name)
        .bind(price_cents)
        .bind(&product.description)
        .bind(&now)
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        let product_id = result.last_insert_rowid();
        replace_tags(&mut tx, owner_id, product_id, &product.tags).await?;

        tx.commit().await?;
        info!(product_id, owner_id, "created product");

        self.find_for_owner(owner_id, product_id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("product"))
    }

    /// Applies a partial update. A supplied tag list replaces the whole tag
    /// set; an absent one leaves it alone.
    pub async fn update(
        &self,
        owner_id: i64,
        id: i64,
        changes: &ProductChanges,
    ) -> DatabaseResult<Product> {
        let name = changes
            .name
            .as_deref()
            .map(|name| validate_name("name", name))
            .transpose()?;
        let price_cents = changes.price.map(price_to_cents).transpose()?;

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = COALESCE(?, name),
                price_cents = COALESCE(?, price_cents),
                description = COALESCE(?, description),
                updated_at = ?
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(name)
        .bind(price_cents)
        .bind(&changes.description)
        .bind(Utc::now().to_rfc3339())
        .bind(id)
        .bind(owner_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("product"));
        }

        if let Some(tags) = &changes.tags {
            replace_tags(&mut tx, owner_id, id, tags).await?;
        }

        tx.commit().await?;

        self.find_for_owner(owner_id, id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("product"))
    }

    /// Deletes a product and its tag associations. The tags themselves stay.
    pub async fn delete(&self, owner_id: i64, id: i64) -> DatabaseResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("product"));
        }

        info!(product_id = id, owner_id, "deleted product");
        Ok(())
    }
}

async fn replace_tags(
    conn: &mut SqliteConnection,
    owner_id: i64,
    product_id: i64,
    names: &[String],
) -> DatabaseResult<()> {
    sqlx::query("DELETE FROM product_tags WHERE product_id = ?")
        .bind(product_id)
        .execute(&mut *conn)
        .await?;

    for name in names {
        let tag = TagRepository::get_or_create(&mut *conn, owner_id, name).await?;

        sqlx::query("INSERT OR IGNORE INTO product_tags (product_id, tag_id) VALUES (?, ?)")
            .bind(product_id)
            .bind(tag.id)
            .execute(&mut *conn)
            .await?;
    }

    debug!(product_id, count = names.len(), "reconciled product tags");
    Ok(())
}
