//! API routes definition

use super::handlers;
use crate::store::SharedStore;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

/// Build the API router with all endpoints
pub fn build_router(store: Arc<SharedStore>) -> Router {
    Router::new()
        .route("/all", get(handlers::all_items))
        .route("/count", get(handlers::count))
        .route("/item", post(handlers::create_item))
        .route(
            "/item/:id",
            get(handlers::get_item)
                .put(handlers::update_item)
                .delete(handlers::delete_item),
        )
        .route("/after/:tick", get(handlers::after))
        .route("/search/:text", get(handlers::search))
        .with_state(store)
}
