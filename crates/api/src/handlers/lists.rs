//! Admin editors for the JSON lists stored under typed content keys.
//!
//! Each handler is generic over the record type; the router instantiates
//! them once per list (`faq`, `gallery-spaces`, `exams`, `convenios`). Every
//! mutation loads the current list, applies one [`OrderedList`] operation,
//! writes the whole list back and invalidates the content cache.
//!
//! An empty list cannot be stored: the site shows the built-in defaults for
//! an empty key, so emptying a list removes the key and the response carries
//! those defaults, the same items the next read returns.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use clinica_core::content::ContentMap;
use clinica_core::ordered_list::OrderedList;
use clinica_core::site_content::ContentList;
use clinica_db::repositories::ContentRepo;
use serde::Deserialize;

use super::uploads::discard_replaced;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /admin/lists/{list}/move`.
#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub from: usize,
    pub to: usize,
}

type ListResponse<T> = Json<DataResponse<Vec<T>>>;

/// Current list, resolved with the same fallbacks public pages use.
async fn load<T: ContentList>(state: &AppState) -> AppResult<OrderedList<T>> {
    let entry = ContentRepo::find_by_key(&state.pool, T::KEY).await?;
    let map: ContentMap = entry.into_iter().map(|e| (e.key, e.value)).collect();
    Ok(OrderedList::from_items(map.list::<T>()))
}

/// Persist `list` and return the items readers will now see.
async fn save<T: ContentList>(state: &AppState, list: &OrderedList<T>) -> AppResult<Vec<T>> {
    if list.is_empty() {
        ContentRepo::delete(&state.pool, T::KEY).await?;
        state.content.invalidate().await;
        tracing::info!(key = T::KEY, "Content list emptied, built-in defaults apply");
        return Ok(T::defaults());
    }

    let json = list
        .to_json()
        .map_err(|e| AppError::InternalError(format!("Failed to serialize {}: {e}", T::LABEL)))?;
    ContentRepo::upsert(&state.pool, T::KEY, &json).await?;
    state.content.invalidate().await;
    tracing::info!(key = T::KEY, items = list.len(), "Content list saved");
    Ok(list.iter().cloned().collect())
}

fn image_urls<'a, T: ContentList>(items: impl IntoIterator<Item = &'a T>) -> Vec<String> {
    items
        .into_iter()
        .flat_map(|item| item.image_urls())
        .map(str::to_string)
        .collect()
}

/// GET /api/v1/admin/lists/{list}
pub async fn get_items<T: ContentList>(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<ListResponse<T>> {
    let list = load::<T>(&state).await?;
    Ok(Json(DataResponse {
        data: list.into_vec(),
    }))
}

/// PUT /api/v1/admin/lists/{list}
///
/// Replace the whole list. Images no longer referenced are discarded.
pub async fn replace_items<T: ContentList>(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(items): Json<Vec<T>>,
) -> AppResult<ListResponse<T>> {
    for item in &items {
        item.validate()?;
    }
    let old = load::<T>(&state).await?;
    let old_urls = image_urls(old.iter());

    let list = OrderedList::from_items(items);
    let saved = save(&state, &list).await?;
    discard_replaced(&state, &old_urls, &image_urls(saved.iter())).await;

    Ok(Json(DataResponse { data: saved }))
}

/// POST /api/v1/admin/lists/{list}/items
pub async fn append_item<T: ContentList>(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(item): Json<T>,
) -> AppResult<(StatusCode, ListResponse<T>)> {
    item.validate()?;
    let mut list = load::<T>(&state).await?;
    list.push(item);
    let saved = save(&state, &list).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: saved })))
}

/// PUT /api/v1/admin/lists/{list}/items/{index}
pub async fn update_item<T: ContentList>(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(index): Path<usize>,
    Json(item): Json<T>,
) -> AppResult<ListResponse<T>> {
    item.validate()?;
    let mut list = load::<T>(&state).await?;
    let previous = list.replace(index, item)?;
    let saved = save(&state, &list).await?;
    // Other items may share the replaced image.
    discard_replaced(&state, &image_urls([&previous]), &image_urls(saved.iter())).await;
    Ok(Json(DataResponse { data: saved }))
}

/// DELETE /api/v1/admin/lists/{list}/items/{index}
pub async fn remove_item<T: ContentList>(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(index): Path<usize>,
) -> AppResult<ListResponse<T>> {
    let mut list = load::<T>(&state).await?;
    let removed = list.remove(index)?;
    let saved = save(&state, &list).await?;
    discard_replaced(&state, &image_urls([&removed]), &image_urls(saved.iter())).await;
    Ok(Json(DataResponse { data: saved }))
}

/// POST /api/v1/admin/lists/{list}/move
pub async fn move_item<T: ContentList>(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(input): Json<MoveRequest>,
) -> AppResult<ListResponse<T>> {
    let mut list = load::<T>(&state).await?;
    list.move_item(input.from, input.to)?;
    let saved = save(&state, &list).await?;
    Ok(Json(DataResponse { data: saved }))
}
