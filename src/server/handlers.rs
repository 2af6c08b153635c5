//! HTTP handlers mapping requests onto store operations

use super::types::{CountResponse, ErrorResponse, TextBody};
use crate::error::StoreError;
use crate::store::{Item, ItemMap, SharedStore};
use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use log::{debug, info, warn};
use std::sync::Arc;

/// Error type for API responses
#[derive(Debug)]
pub enum ApiError {
    /// Store rejected the operation
    Store(StoreError),
    /// Request could not be turned into typed input
    BadRequest(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(StoreError::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Store(StoreError::Closed) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match self {
            ApiError::Store(e) => e.to_string(),
            ApiError::BadRequest(msg) => msg,
        };
        if status.is_server_error() {
            warn!("Request failed with {}: {}", status, error);
        }
        (status, Json(ErrorResponse { error })).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Store(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

type ApiResult<T> = Result<T, ApiError>;

/// GET /all
pub async fn all_items(State(store): State<Arc<SharedStore>>) -> ApiResult<Json<ItemMap>> {
    debug!("GET /all");
    Ok(Json(store.all()?))
}

/// GET /count
pub async fn count(State(store): State<Arc<SharedStore>>) -> ApiResult<Json<CountResponse>> {
    debug!("GET /count");
    Ok(Json(CountResponse { count: store.count()? }))
}

/// POST /item
pub async fn create_item(
    State(store): State<Arc<SharedStore>>,
    body: Result<Json<TextBody>, JsonRejection>,
) -> ApiResult<Json<Item>> {
    let Json(body) = body?;
    let item = store.create(&body.text)?;
    info!("POST /item -> {} (tick {})", item.id, item.tick);
    Ok(Json(item))
}

/// GET /item/:id
pub async fn get_item(
    State(store): State<Arc<SharedStore>>,
    id: Result<Path<u64>, PathRejection>,
) -> ApiResult<Json<Item>> {
    let Path(id) = id?;
    debug!("GET /item/{}", id);
    Ok(Json(store.get(id)?))
}

/// PUT /item/:id
pub async fn update_item(
    State(store): State<Arc<SharedStore>>,
    id: Result<Path<u64>, PathRejection>,
    body: Result<Json<TextBody>, JsonRejection>,
) -> ApiResult<Json<Item>> {
    let Path(id) = id?;
    let Json(body) = body?;
    let item = store.update(id, &body.text)?;
    info!("PUT /item/{} (tick {})", id, item.tick);
    Ok(Json(item))
}

/// DELETE /item/:id
pub async fn delete_item(
    State(store): State<Arc<SharedStore>>,
    id: Result<Path<u64>, PathRejection>,
) -> ApiResult<Json<Item>> {
    let Path(id) = id?;
    let item = store.delete(id)?;
    info!("DELETE /item/{} (tick {})", id, item.tick);
    Ok(Json(item))
}

/// GET /after/:tick
pub async fn after(
    State(store): State<Arc<SharedStore>>,
    tick: Result<Path<u64>, PathRejection>,
) -> ApiResult<Json<ItemMap>> {
    let Path(tick) = tick?;
    debug!("GET /after/{}", tick);
    Ok(Json(store.after(tick)?))
}

/// GET /search/:text
pub async fn search(
    State(store): State<Arc<SharedStore>>,
    Path(text): Path<String>,
) -> ApiResult<Json<ItemMap>> {
    debug!("GET /search/{}", text);
    Ok(Json(store.search(&text)?))
}
