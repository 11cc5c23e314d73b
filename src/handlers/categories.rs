//! Category routes: the flat listing and the category-scoped item listing.

use axum::extract::{Path, Query, State};
use axum::Json;

use crate::domain::{CategoryDto, ItemDto};
use crate::repository::{CategoryRepository, ItemRepository};
use crate::state::AppState;

use super::error::ApiError;
use super::query::PageQuery;

pub async fn list_categories<I, C>(
    State(state): State<AppState<I, C>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<CategoryDto>>, ApiError>
where
    I: ItemRepository + 'static,
    C: CategoryRepository + 'static,
{
    let page = state.categories.find_all(query.page_request()).await?;
    Ok(Json(page.content))
}

/// `GET /categories/{categoryId}/items` — 404s when the category itself is
/// absent; an existing category with no items is an empty 200.
pub async fn list_category_items<I, C>(
    State(state): State<AppState<I, C>>,
    Path(category_id): Path<i64>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<ItemDto>>, ApiError>
where
    I: ItemRepository + 'static,
    C: CategoryRepository + 'static,
{
    if !state.categories.exists_by_id(category_id).await? {
        return Err(ApiError::not_found("Category", category_id));
    }
    let page = state
        .items
        .find_by_category_id(category_id, query.page_request())
        .await?;
    Ok(Json(page.content))
}
