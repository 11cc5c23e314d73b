//! Async repository traits for the two catalog entities.
//!
//! Both relation-scoped item queries must honor identical ordering (id
//! ascending) and identical count semantics so the service layer can swap
//! between them without observable differences.

use std::future::Future;

use crate::domain::{Category, Item};

use super::{Page, PageRequest, RepositoryError};

pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

pub trait CategoryRepository: Send + Sync {
    fn find_all(
        &self,
        request: PageRequest,
    ) -> impl Future<Output = RepositoryResult<Page<Category>>> + Send;

    fn find_by_id(
        &self,
        id: i64,
    ) -> impl Future<Output = RepositoryResult<Option<Category>>> + Send;

    fn exists_by_id(&self, id: i64) -> impl Future<Output = RepositoryResult<bool>> + Send;

    /// Insert when `category.id` is `None`, update otherwise. Returns the
    /// persisted row.
    fn save(
        &self,
        category: Category,
    ) -> impl Future<Output = RepositoryResult<Category>> + Send;

    /// Returns whether a row was removed.
    fn delete_by_id(&self, id: i64) -> impl Future<Output = RepositoryResult<bool>> + Send;
}

pub trait ItemRepository: Send + Sync {
    fn find_all(
        &self,
        request: PageRequest,
    ) -> impl Future<Output = RepositoryResult<Page<Item>>> + Send;

    fn find_by_id(&self, id: i64) -> impl Future<Output = RepositoryResult<Option<Item>>> + Send;

    fn exists_by_id(&self, id: i64) -> impl Future<Output = RepositoryResult<bool>> + Send;

    /// Items in one category, rows only. Callers resolve each item's
    /// category separately (one lookup per row).
    fn find_by_category_id(
        &self,
        category_id: i64,
        request: PageRequest,
    ) -> impl Future<Output = RepositoryResult<Page<Item>>> + Send;

    /// Items in one category with the owning category carried alongside in
    /// a single round trip.
    fn find_by_category_id_with_join(
        &self,
        category_id: i64,
        request: PageRequest,
    ) -> impl Future<Output = RepositoryResult<Page<(Item, Category)>>> + Send;

    /// Insert when `item.id` is `None`, update otherwise. Returns the
    /// persisted row.
    fn save(&self, item: Item) -> impl Future<Output = RepositoryResult<Item>> + Send;

    /// Returns whether a row was removed.
    fn delete_by_id(&self, id: i64) -> impl Future<Output = RepositoryResult<bool>> + Send;
}
