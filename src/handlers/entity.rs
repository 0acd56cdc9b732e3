//! Entity CRUD handlers, generic over the resource: list, read, create, update, delete.

use crate::error::ApiError;
use crate::extractors::{RecordBody, RequestMeta};
use crate::model::Resource;
use crate::response::{success_created, success_many, success_ok};
use crate::service::CrudService;
use crate::state::AppState;
use crate::views;
use axum::{
    extract::{Path, State},
    http::{header::ACCEPT, HeaderMap},
    response::{Html, IntoResponse, Response},
};
use serde_json::json;

/// JSON only when asked for; browsers get the HTML view.
fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|accept| accept.contains("application/json"))
        .unwrap_or(false)
}

pub async fn list<R: Resource>(
    State(state): State<AppState>,
    meta: RequestMeta,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let items = CrudService::list::<R>(state.db()).await.map_err(|e| meta.reject(e))?;
    if wants_json(&headers) {
        return Ok(success_many(items, meta.meta()).into_response());
    }
    Ok(Html(views::render_list(&items)).into_response())
}

pub async fn read<R: Resource>(
    State(state): State<AppState>,
    meta: RequestMeta,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let item = CrudService::get::<R>(state.db(), &id).await.map_err(|e| meta.reject(e))?;
    Ok(success_ok(item, meta.meta()))
}

pub async fn create<R: Resource>(
    State(state): State<AppState>,
    meta: RequestMeta,
    RecordBody(body): RecordBody,
) -> Result<impl IntoResponse, ApiError> {
    let item = CrudService::create::<R>(state.db(), &body).await.map_err(|e| meta.reject(e))?;
    Ok(success_created(item, meta.meta()))
}

pub async fn update<R: Resource>(
    State(state): State<AppState>,
    meta: RequestMeta,
    Path(id): Path<String>,
    RecordBody(body): RecordBody,
) -> Result<impl IntoResponse, ApiError> {
    let item = CrudService::update::<R>(state.db(), &id, &body)
        .await
        .map_err(|e| meta.reject(e))?;
    Ok(success_ok(item, meta.meta()))
}

pub async fn delete<R: Resource>(
    State(state): State<AppState>,
    meta: RequestMeta,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = CrudService::delete::<R>(state.db(), &id).await.map_err(|e| meta.reject(e))?;
    let message = format!("{} deleted successfully", R::def().label);
    Ok(success_ok(json!({ "message": message, "id": id }), meta.meta()))
}

/// Form-driven delete: removes the row, then renders the refreshed list.
pub async fn delete_view<R: Resource>(
    State(state): State<AppState>,
    meta: RequestMeta,
    Path(id): Path<String>,
) -> Result<Html<String>, ApiError> {
    CrudService::delete::<R>(state.db(), &id).await.map_err(|e| meta.reject(e))?;
    let items = CrudService::list::<R>(state.db()).await.map_err(|e| meta.reject(e))?;
    Ok(Html(views::render_list(&items)))
}

pub async fn home() -> Html<String> {
    Html(views::render_home())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn accept_header_selects_json() {
        let mut headers = HeaderMap::new();
        assert!(!wants_json(&headers));
        headers.insert(ACCEPT, HeaderValue::from_static("text/html,application/xhtml+xml"));
        assert!(!wants_json(&headers));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        assert!(wants_json(&headers));
    }
}
