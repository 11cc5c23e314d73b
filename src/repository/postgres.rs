//! PostgreSQL repositories.
//!
//! Runtime-checked queries over a shared [`PgPool`]. Both category-scoped
//! item queries order by id ascending and share count semantics, so either
//! fetch strategy paginates identically.

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::domain::{Category, Item};

use super::{
    CategoryRepository, ItemRepository, Page, PageRequest, RepositoryResult,
};

#[derive(Debug, Clone)]
pub struct PgCategoryRepository {
    pool: PgPool,
}

impl PgCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl CategoryRepository for PgCategoryRepository {
    async fn find_all(&self, request: PageRequest) -> RepositoryResult<Page<Category>> {
        let rows = sqlx::query_as::<_, Category>(
            "SELECT id, code, name FROM categories ORDER BY id LIMIT $1 OFFSET $2",
        )
        .bind(request.limit() as i64)
        .bind(request.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await?;

        Ok(Page::new(rows, request, total as u64))
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Category>> {
        let row = sqlx::query_as::<_, Category>(
            "SELECT id, code, name FROM categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn exists_by_id(&self, id: i64) -> RepositoryResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn save(&self, category: Category) -> RepositoryResult<Category> {
        let row = match category.id {
            Some(id) => {
                sqlx::query_as::<_, Category>(
                    "UPDATE categories SET code = $2, name = $3 WHERE id = $1 \
                     RETURNING id, code, name",
                )
                .bind(id)
                .bind(&category.code)
                .bind(&category.name)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Category>(
                    "INSERT INTO categories (code, name) VALUES ($1, $2) \
                     RETURNING id, code, name",
                )
                .bind(&category.code)
                .bind(&category.name)
                .fetch_one(&self.pool)
                .await?
            }
        };
        Ok(row)
    }

    async fn delete_by_id(&self, id: i64) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[derive(Debug, Clone)]
pub struct PgItemRepository {
    pool: PgPool,
}

impl PgItemRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const ITEM_COLUMNS: &str = "id, sku, name, price, stock, description, category_id";

/// Flat row for the joined query; split into entity pair after decoding.
#[derive(sqlx::FromRow)]
struct ItemWithCategoryRow {
    id: Option<i64>,
    sku: String,
    name: String,
    price: Decimal,
    stock: i32,
    description: Option<String>,
    category_id: i64,
    category_code: String,
    category_name: String,
}

impl ItemWithCategoryRow {
    fn split(self) -> (Item, Category) {
        let category = Category {
            id: Some(self.category_id),
            code: self.category_code,
            name: self.category_name,
        };
        let item = Item {
            id: self.id,
            sku: self.sku,
            name: self.name,
            price: self.price,
            stock: self.stock,
            description: self.description,
            category_id: self.category_id,
        };
        (item, category)
    }
}

impl ItemRepository for PgItemRepository {
    async fn find_all(&self, request: PageRequest) -> RepositoryResult<Page<Item>> {
        let rows = sqlx::query_as::<_, Item>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items ORDER BY id LIMIT $1 OFFSET $2"
        ))
        .bind(request.limit() as i64)
        .bind(request.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await?;

        Ok(Page::new(rows, request, total as u64))
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Item>> {
        let row = sqlx::query_as::<_, Item>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn exists_by_id(&self, id: i64) -> RepositoryResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM items WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn find_by_category_id(
        &self,
        category_id: i64,
        request: PageRequest,
    ) -> RepositoryResult<Page<Item>> {
        let rows = sqlx::query_as::<_, Item>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items WHERE category_id = $1 \
             ORDER BY id LIMIT $2 OFFSET $3"
        ))
        .bind(category_id)
        .bind(request.limit() as i64)
        .bind(request.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        let total = self.count_by_category(category_id).await?;
        Ok(Page::new(rows, request, total))
    }

    async fn find_by_category_id_with_join(
        &self,
        category_id: i64,
        request: PageRequest,
    ) -> RepositoryResult<Page<(Item, Category)>> {
        let rows = sqlx::query_as::<_, ItemWithCategoryRow>(
            "SELECT i.id, i.sku, i.name, i.price, i.stock, i.description, i.category_id, \
                    c.code AS category_code, c.name AS category_name \
             FROM items i JOIN categories c ON c.id = i.category_id \
             WHERE i.category_id = $1 ORDER BY i.id LIMIT $2 OFFSET $3",
        )
        .bind(category_id)
        .bind(request.limit() as i64)
        .bind(request.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        let total = self.count_by_category(category_id).await?;
        let content = rows.into_iter().map(ItemWithCategoryRow::split).collect();
        Ok(Page::new(content, request, total))
    }

    async fn save(&self, item: Item) -> RepositoryResult<Item> {
        let row = match item.id {
            Some(id) => {
                sqlx::query_as::<_, Item>(&format!(
                    "UPDATE items SET sku = $2, name = $3, price = $4, stock = $5, \
                     description = $6, category_id = $7 WHERE id = $1 \
                     RETURNING {ITEM_COLUMNS}"
                ))
                .bind(id)
                .bind(&item.sku)
                .bind(&item.name)
                .bind(item.price)
                .bind(item.stock)
                .bind(&item.description)
                .bind(item.category_id)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Item>(&format!(
                    "INSERT INTO items (sku, name, price, stock, description, category_id) \
                     VALUES ($1, $2, $3, $4, $5, $6) RETURNING {ITEM_COLUMNS}"
                ))
                .bind(&item.sku)
                .bind(&item.name)
                .bind(item.price)
                .bind(item.stock)
                .bind(&item.description)
                .bind(item.category_id)
                .fetch_one(&self.pool)
                .await?
            }
        };
        Ok(row)
    }

    async fn delete_by_id(&self, id: i64) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

impl PgItemRepository {
    async fn count_by_category(&self, category_id: i64) -> RepositoryResult<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items WHERE category_id = $1")
            .bind(category_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(total as u64)
    }
}
