//! Shared application state handed to the router.

use std::sync::Arc;

use crate::repository::{CategoryRepository, ItemRepository};
use crate::service::{CategoryService, ItemService};

pub struct AppState<I, C> {
    pub items: Arc<ItemService<I, C>>,
    pub categories: Arc<CategoryService<C>>,
}

impl<I, C> AppState<I, C>
where
    I: ItemRepository,
    C: CategoryRepository,
{
    /// Wire both services over the given repositories. The fetch-strategy
    /// flag is fixed here for the lifetime of the process.
    pub fn new(items: Arc<I>, categories: Arc<C>, use_join_fetch: bool) -> Self {
        Self {
            items: Arc::new(ItemService::new(items, Arc::clone(&categories), use_join_fetch)),
            categories: Arc::new(CategoryService::new(categories)),
        }
    }
}

impl<I, C> Clone for AppState<I, C> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
            categories: Arc::clone(&self.categories),
        }
    }
}
