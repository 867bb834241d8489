use axum::Router;
use axum::middleware;
use axum::routing::{get, post};
use crate::state::AppState;

pub mod dto;
pub mod handler;
pub mod heuristics;
pub mod model;
pub mod repository;
pub mod service;
pub mod slug;

pub fn router(state: AppState) -> Router<AppState> {
    let compose_routes = Router::new()
        .route("/compose", post(handler::compose_course))
        .route_layer(middleware::from_fn_with_state(
            state,
            crate::middleware::creator::creator_context,
        ));

    Router::new()
        .route("/{slug}", get(handler::get_course))
        .merge(compose_routes)
}
