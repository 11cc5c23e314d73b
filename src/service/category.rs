//! Category CRUD. No fetch-strategy dimension: categories are single-table
//! reads.

use std::sync::Arc;

use crate::domain::{mapper, CategoryDto};
use crate::repository::{CategoryRepository, Page, PageRequest, RepositoryResult};

pub struct CategoryService<C> {
    categories: Arc<C>,
}

impl<C: CategoryRepository> CategoryService<C> {
    pub fn new(categories: Arc<C>) -> Self {
        Self { categories }
    }

    pub async fn find_all(&self, request: PageRequest) -> RepositoryResult<Page<CategoryDto>> {
        let page = self.categories.find_all(request).await?;
        Ok(page.map(|c| mapper::category_to_dto(&c)))
    }

    pub async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<CategoryDto>> {
        let category = self.categories.find_by_id(id).await?;
        Ok(category.map(|c| mapper::category_to_dto(&c)))
    }

    pub async fn exists_by_id(&self, id: i64) -> RepositoryResult<bool> {
        self.categories.exists_by_id(id).await
    }

    pub async fn save(&self, dto: CategoryDto) -> RepositoryResult<CategoryDto> {
        let saved = self.categories.save(mapper::category_from_dto(&dto)).await?;
        Ok(mapper::category_to_dto(&saved))
    }

    pub async fn delete_by_id(&self, id: i64) -> RepositoryResult<bool> {
        self.categories.delete_by_id(id).await
    }
}
