//! HTTP route handlers and the API router.
//!
//! Every listing endpoint serializes only the page content as a JSON array;
//! page metadata stays server-side so both fetch strategies present the
//! same wire shape.

mod categories;
mod error;
mod items;
mod query;

use axum::routing::get;
use axum::Router;

use crate::repository::{CategoryRepository, ItemRepository};
use crate::state::AppState;

pub use error::{ApiError, ApiErrorKind};
pub use query::{ItemListQuery, PageQuery, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// The complete API surface, unprefixed. The server nests this under the
/// configured base path.
pub fn api_router<I, C>(state: AppState<I, C>) -> Router
where
    I: ItemRepository + 'static,
    C: CategoryRepository + 'static,
{
    Router::new()
        .route("/categories", get(categories::list_categories::<I, C>))
        .route(
            "/categories/{category_id}/items",
            get(categories::list_category_items::<I, C>),
        )
        .route(
            "/items",
            get(items::list_items::<I, C>).post(items::create_item::<I, C>),
        )
        .route(
            "/items/{id}",
            get(items::get_item::<I, C>)
                .put(items::update_item::<I, C>)
                .delete(items::delete_item::<I, C>),
        )
        .with_state(state)
}
