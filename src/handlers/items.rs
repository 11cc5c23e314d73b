//! Item routes: listing (optionally filtered by category), single fetch,
//! and the write surface.

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use crate::domain::ItemDto;
use crate::repository::{CategoryRepository, ItemRepository};
use crate::state::AppState;

use super::error::ApiError;
use super::query::ItemListQuery;

/// `GET /items` — with `categoryId` this is the relation-scoped listing
/// (running under the configured fetch strategy); without it, all items.
/// An unknown `categoryId` filter is an empty 200, not a 404.
pub async fn list_items<I, C>(
    State(state): State<AppState<I, C>>,
    Query(query): Query<ItemListQuery>,
) -> Result<Json<Vec<ItemDto>>, ApiError>
where
    I: ItemRepository + 'static,
    C: CategoryRepository + 'static,
{
    let request = query.page_request();
    let page = match query.category_id {
        Some(category_id) => state.items.find_by_category_id(category_id, request).await?,
        None => state.items.find_all(request).await?,
    };
    Ok(Json(page.content))
}

pub async fn get_item<I, C>(
    State(state): State<AppState<I, C>>,
    Path(id): Path<i64>,
) -> Result<Json<ItemDto>, ApiError>
where
    I: ItemRepository + 'static,
    C: CategoryRepository + 'static,
{
    let item = state
        .items
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Item", id))?;
    Ok(Json(item))
}

/// `POST /items` — 201 with a `Location` header pointing at the new row;
/// validation failures are 400 and leave the store untouched.
pub async fn create_item<I, C>(
    State(state): State<AppState<I, C>>,
    Json(dto): Json<ItemDto>,
) -> Result<impl IntoResponse, ApiError>
where
    I: ItemRepository + 'static,
    C: CategoryRepository + 'static,
{
    let dto = ItemDto { id: None, ..dto };
    let saved = state.items.save(dto).await?;
    let location = saved
        .id
        .map(|id| format!("/items/{id}"))
        .unwrap_or_else(|| "/items".to_string());
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(saved),
    ))
}

/// `PUT /items/{id}` — existence-gated; the path id wins over any id in the
/// body.
pub async fn update_item<I, C>(
    State(state): State<AppState<I, C>>,
    Path(id): Path<i64>,
    Json(dto): Json<ItemDto>,
) -> Result<Json<ItemDto>, ApiError>
where
    I: ItemRepository + 'static,
    C: CategoryRepository + 'static,
{
    if !state.items.exists_by_id(id).await? {
        return Err(ApiError::not_found("Item", id));
    }
    let dto = ItemDto { id: Some(id), ..dto };
    let saved = state.items.save(dto).await?;
    Ok(Json(saved))
}

/// `DELETE /items/{id}` — existence-gated 404, otherwise 204.
pub async fn delete_item<I, C>(
    State(state): State<AppState<I, C>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError>
where
    I: ItemRepository + 'static,
    C: CategoryRepository + 'static,
{
    if !state.items.exists_by_id(id).await? {
        return Err(ApiError::not_found("Item", id));
    }
    state.items.delete_by_id(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
