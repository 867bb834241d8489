use axum::Router;
use axum::middleware;
use axum::routing::{get, post};
use crate::state::AppState;

pub mod dto;
pub mod handler;
pub mod model;
pub mod normalizer;
pub mod repository;
pub mod service;

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/ingest", post(handler::ingest_links))
        .route("/{id}", get(handler::get_link))
        .route_layer(middleware::from_fn_with_state(
            state,
            crate::middleware::creator::creator_context,
        ))
}
