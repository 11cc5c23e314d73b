//! Item CRUD plus the relation fetch-strategy toggle.
//!
//! The toggle is injected at construction and read-only afterwards; both
//! strategies must produce identical DTO content and page metadata for the
//! same data. A dangling category reference discovered while mapping a read
//! is a data-integrity failure, never a not-found.

use std::sync::Arc;

use crate::domain::{mapper, Category, Item, ItemDto};
use crate::repository::{
    CategoryRepository, ItemRepository, Page, PageRequest, RepositoryError,
    RepositoryOperation, RepositoryResult,
};

pub struct ItemService<I, C> {
    items: Arc<I>,
    categories: Arc<C>,
    use_join_fetch: bool,
}

impl<I, C> ItemService<I, C>
where
    I: ItemRepository,
    C: CategoryRepository,
{
    pub fn new(items: Arc<I>, categories: Arc<C>, use_join_fetch: bool) -> Self {
        Self {
            items,
            categories,
            use_join_fetch,
        }
    }

    pub fn use_join_fetch(&self) -> bool {
        self.use_join_fetch
    }

    pub async fn find_all(&self, request: PageRequest) -> RepositoryResult<Page<ItemDto>> {
        let page = self.items.find_all(request).await?;
        self.map_page(page, RepositoryOperation::FindAll).await
    }

    pub async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<ItemDto>> {
        match self.items.find_by_id(id).await? {
            Some(item) => {
                let category = self
                    .resolve_category(&item, RepositoryOperation::FindById)
                    .await?;
                Ok(Some(mapper::item_to_dto(&item, &category)))
            }
            None => Ok(None),
        }
    }

    /// Items in one category, fetched per the configured strategy. Does not
    /// check that the category exists; an unknown id yields an empty page.
    pub async fn find_by_category_id(
        &self,
        category_id: i64,
        request: PageRequest,
    ) -> RepositoryResult<Page<ItemDto>> {
        tracing::debug!(
            category_id,
            use_join_fetch = self.use_join_fetch,
            "listing items for category"
        );
        if self.use_join_fetch {
            let page = self
                .items
                .find_by_category_id_with_join(category_id, request)
                .await?;
            Ok(page.map(|(item, category)| mapper::item_to_dto(&item, &category)))
        } else {
            let page = self.items.find_by_category_id(category_id, request).await?;
            self.map_page(page, RepositoryOperation::FindByCategory).await
        }
    }

    /// Insert when `dto.id` is `None`, update otherwise. Validation happens
    /// before any write: a rejected save leaves the store untouched.
    pub async fn save(&self, dto: ItemDto) -> RepositoryResult<ItemDto> {
        let category_id = dto
            .category_id
            .ok_or_else(|| RepositoryError::validation_failed("item requires a categoryId"))?;
        if dto.price.is_sign_negative() {
            return Err(RepositoryError::validation_failed("price must not be negative"));
        }
        if dto.stock < 0 {
            return Err(RepositoryError::validation_failed("stock must not be negative"));
        }
        let category = self
            .categories
            .find_by_id(category_id)
            .await?
            .ok_or_else(|| {
                RepositoryError::validation_failed(format!(
                    "category {category_id} does not exist"
                ))
                .with_entity("Category", category_id)
            })?;

        let saved = self.items.save(mapper::item_from_dto(&dto, category_id)).await?;
        Ok(mapper::item_to_dto(&saved, &category))
    }

    pub async fn delete_by_id(&self, id: i64) -> RepositoryResult<bool> {
        self.items.delete_by_id(id).await
    }

    pub async fn exists_by_id(&self, id: i64) -> RepositoryResult<bool> {
        self.items.exists_by_id(id).await
    }

    /// Per-row category resolution for the lookup path.
    async fn map_page(
        &self,
        page: Page<Item>,
        operation: RepositoryOperation,
    ) -> RepositoryResult<Page<ItemDto>> {
        let mut content = Vec::with_capacity(page.content.len());
        for item in &page.content {
            let category = self.resolve_category(item, operation).await?;
            content.push(mapper::item_to_dto(item, &category));
        }
        Ok(Page {
            content,
            page: page.page,
            size: page.size,
            total_elements: page.total_elements,
        })
    }

    async fn resolve_category(
        &self,
        item: &Item,
        operation: RepositoryOperation,
    ) -> RepositoryResult<Category> {
        self.categories
            .find_by_id(item.category_id)
            .await?
            .ok_or_else(|| {
                RepositoryError::database_error(
                    operation,
                    format!(
                        "item {} references missing category {}",
                        item.id.map_or_else(|| "?".to_string(), |id| id.to_string()),
                        item.category_id
                    ),
                )
            })
    }
}
