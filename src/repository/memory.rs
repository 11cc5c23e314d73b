//! In-memory repositories backed by a shared, lock-protected store.
//!
//! Used when no database is configured and throughout the test suite. The
//! store mirrors the relational constraints the Postgres schema enforces
//! (unique codes/skus, items owned by an existing category) so behavior does
//! not drift between backends.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::{Category, Item};

use super::{
    CategoryRepository, ItemRepository, Page, PageRequest, RepositoryError, RepositoryOperation,
    RepositoryResult,
};

#[derive(Debug, Default)]
struct Tables {
    categories: BTreeMap<i64, Category>,
    items: BTreeMap<i64, Item>,
    next_category_id: i64,
    next_item_id: i64,
}

/// Shared in-memory store implementing both repository traits. Cloning
/// yields a handle to the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self, op: RepositoryOperation) -> RepositoryResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| RepositoryError::database_error(op, "store lock poisoned"))
    }

    fn write(&self, op: RepositoryOperation) -> RepositoryResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| RepositoryError::database_error(op, "store lock poisoned"))
    }
}

fn paginate<T: Clone>(rows: impl Iterator<Item = T>, request: PageRequest) -> (Vec<T>, u64) {
    let all: Vec<T> = rows.collect();
    let total = all.len() as u64;
    let content = all
        .into_iter()
        .skip(request.offset() as usize)
        .take(request.limit() as usize)
        .collect();
    (content, total)
}

impl CategoryRepository for MemoryStore {
    async fn find_all(&self, request: PageRequest) -> RepositoryResult<Page<Category>> {
        let tables = self.read(RepositoryOperation::FindAll)?;
        let (content, total) = paginate(tables.categories.values().cloned(), request);
        Ok(Page::new(content, request, total))
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Category>> {
        let tables = self.read(RepositoryOperation::FindById)?;
        Ok(tables.categories.get(&id).cloned())
    }

    async fn exists_by_id(&self, id: i64) -> RepositoryResult<bool> {
        let tables = self.read(RepositoryOperation::Exists)?;
        Ok(tables.categories.contains_key(&id))
    }

    async fn save(&self, category: Category) -> RepositoryResult<Category> {
        let mut tables = self.write(RepositoryOperation::Save)?;
        let duplicate_code = tables
            .categories
            .values()
            .any(|c| c.code == category.code && c.id != category.id);
        if duplicate_code {
            return Err(RepositoryError::constraint_violation(
                RepositoryOperation::Save,
                format!("category code '{}' already exists", category.code),
            ));
        }
        let id = match category.id {
            Some(id) => id,
            None => {
                tables.next_category_id += 1;
                tables.next_category_id
            }
        };
        let persisted = Category {
            id: Some(id),
            ..category
        };
        tables.categories.insert(id, persisted.clone());
        Ok(persisted)
    }

    async fn delete_by_id(&self, id: i64) -> RepositoryResult<bool> {
        let mut tables = self.write(RepositoryOperation::Delete)?;
        let has_items = tables.items.values().any(|i| i.category_id == id);
        if has_items {
            return Err(RepositoryError::constraint_violation(
                RepositoryOperation::Delete,
                format!("category {id} still owns items"),
            ));
        }
        Ok(tables.categories.remove(&id).is_some())
    }
}

impl ItemRepository for MemoryStore {
    async fn find_all(&self, request: PageRequest) -> RepositoryResult<Page<Item>> {
        let tables = self.read(RepositoryOperation::FindAll)?;
        let (content, total) = paginate(tables.items.values().cloned(), request);
        Ok(Page::new(content, request, total))
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Item>> {
        let tables = self.read(RepositoryOperation::FindById)?;
        Ok(tables.items.get(&id).cloned())
    }

    async fn exists_by_id(&self, id: i64) -> RepositoryResult<bool> {
        let tables = self.read(RepositoryOperation::Exists)?;
        Ok(tables.items.contains_key(&id))
    }

    async fn find_by_category_id(
        &self,
        category_id: i64,
        request: PageRequest,
    ) -> RepositoryResult<Page<Item>> {
        let tables = self.read(RepositoryOperation::FindByCategory)?;
        let (content, total) = paginate(
            tables
                .items
                .values()
                .filter(|i| i.category_id == category_id)
                .cloned(),
            request,
        );
        Ok(Page::new(content, request, total))
    }

    async fn find_by_category_id_with_join(
        &self,
        category_id: i64,
        request: PageRequest,
    ) -> RepositoryResult<Page<(Item, Category)>> {
        let tables = self.read(RepositoryOperation::FindByCategory)?;
        let mut rows = Vec::new();
        for item in tables.items.values().filter(|i| i.category_id == category_id) {
            let category = tables.categories.get(&item.category_id).ok_or_else(|| {
                RepositoryError::database_error(
                    RepositoryOperation::FindByCategory,
                    format!(
                        "item {:?} references missing category {}",
                        item.id, item.category_id
                    ),
                )
            })?;
            rows.push((item.clone(), category.clone()));
        }
        let (content, total) = paginate(rows.into_iter(), request);
        Ok(Page::new(content, request, total))
    }

    async fn save(&self, item: Item) -> RepositoryResult<Item> {
        let mut tables = self.write(RepositoryOperation::Save)?;
        if !tables.categories.contains_key(&item.category_id) {
            return Err(RepositoryError::constraint_violation(
                RepositoryOperation::Save,
                format!("item references missing category {}", item.category_id),
            ));
        }
        let duplicate_sku = tables
            .items
            .values()
            .any(|i| i.sku == item.sku && i.id != item.id);
        if duplicate_sku {
            return Err(RepositoryError::constraint_violation(
                RepositoryOperation::Save,
                format!("item sku '{}' already exists", item.sku),
            ));
        }
        let id = match item.id {
            Some(id) => id,
            None => {
                tables.next_item_id += 1;
                tables.next_item_id
            }
        };
        let persisted = Item {
            id: Some(id),
            ..item
        };
        tables.items.insert(id, persisted.clone());
        Ok(persisted)
    }

    async fn delete_by_id(&self, id: i64) -> RepositoryResult<bool> {
        let mut tables = self.write(RepositoryOperation::Delete)?;
        Ok(tables.items.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::RepositoryErrorKind;
    use rust_decimal::Decimal;

    fn category(code: &str, name: &str) -> Category {
        Category {
            id: None,
            code: code.to_string(),
            name: name.to_string(),
        }
    }

    fn item(sku: &str, category_id: i64) -> Item {
        Item {
            id: None,
            sku: sku.to_string(),
            name: format!("Item {sku}"),
            price: Decimal::new(1000, 2),
            stock: 5,
            description: None,
            category_id,
        }
    }

    #[tokio::test]
    async fn save_assigns_sequential_ids() {
        let store = MemoryStore::new();
        let a = CategoryRepository::save(&store, category("ELEC", "Electronics"))
            .await
            .unwrap();
        let b = CategoryRepository::save(&store, category("BOOK", "Books"))
            .await
            .unwrap();
        assert_eq!(a.id, Some(1));
        assert_eq!(b.id, Some(2));
    }

    #[tokio::test]
    async fn item_save_rejects_missing_category() {
        let store = MemoryStore::new();
        let err = ItemRepository::save(&store, item("X-1", 999))
            .await
            .unwrap_err();
        assert_eq!(err.kind, RepositoryErrorKind::ConstraintViolation);
    }

    #[tokio::test]
    async fn duplicate_sku_is_rejected_but_update_is_not() {
        let store = MemoryStore::new();
        let cat = CategoryRepository::save(&store, category("ELEC", "Electronics"))
            .await
            .unwrap();
        let saved = ItemRepository::save(&store, item("X-1", cat.id.unwrap()))
            .await
            .unwrap();

        let err = ItemRepository::save(&store, item("X-1", cat.id.unwrap()))
            .await
            .unwrap_err();
        assert_eq!(err.kind, RepositoryErrorKind::ConstraintViolation);

        // Re-saving the same row under its own id is an update.
        let updated = ItemRepository::save(&store, Item { stock: 9, ..saved })
            .await
            .unwrap();
        assert_eq!(updated.stock, 9);
    }

    #[tokio::test]
    async fn category_scoped_queries_agree() {
        let store = MemoryStore::new();
        let elec = CategoryRepository::save(&store, category("ELEC", "Electronics"))
            .await
            .unwrap();
        let books = CategoryRepository::save(&store, category("BOOK", "Books"))
            .await
            .unwrap();
        for i in 0..5 {
            ItemRepository::save(&store, item(&format!("E-{i}"), elec.id.unwrap()))
                .await
                .unwrap();
        }
        ItemRepository::save(&store, item("B-0", books.id.unwrap()))
            .await
            .unwrap();

        let request = PageRequest::new(1, 2);
        let plain = store
            .find_by_category_id(elec.id.unwrap(), request)
            .await
            .unwrap();
        let joined = store
            .find_by_category_id_with_join(elec.id.unwrap(), request)
            .await
            .unwrap();

        assert_eq!(plain.total_elements, 5);
        assert_eq!(joined.total_elements, 5);
        assert_eq!(plain.len(), 2);
        assert_eq!(
            plain.content,
            joined
                .content
                .iter()
                .map(|(i, _)| i.clone())
                .collect::<Vec<_>>()
        );
        assert!(joined.content.iter().all(|(_, c)| c.code == "ELEC"));
    }

    #[tokio::test]
    async fn delete_reports_whether_a_row_was_removed() {
        let store = MemoryStore::new();
        let cat = CategoryRepository::save(&store, category("ELEC", "Electronics"))
            .await
            .unwrap();
        let saved = ItemRepository::save(&store, item("X-1", cat.id.unwrap()))
            .await
            .unwrap();
        let id = saved.id.unwrap();
        assert!(ItemRepository::delete_by_id(&store, id).await.unwrap());
        assert!(!ItemRepository::delete_by_id(&store, id).await.unwrap());
        assert!(!ItemRepository::exists_by_id(&store, id).await.unwrap());
    }

    #[tokio::test]
    async fn deleting_an_owning_category_is_blocked() {
        let store = MemoryStore::new();
        let cat = CategoryRepository::save(&store, category("ELEC", "Electronics"))
            .await
            .unwrap();
        ItemRepository::save(&store, item("X-1", cat.id.unwrap()))
            .await
            .unwrap();
        let err = CategoryRepository::delete_by_id(&store, cat.id.unwrap())
            .await
            .unwrap_err();
        assert_eq!(err.kind, RepositoryErrorKind::ConstraintViolation);
    }
}
