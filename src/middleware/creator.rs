use crate::common::response::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

pub const CREATOR_HEADER: &str = "x-creator-id";

/// The creator on whose behalf a request runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreatorContext {
    pub creator_id: Uuid,
}

/// Resolves the creator from `x-creator-id`, falling back to the configured
/// demo creator when the header is absent.
pub async fn creator_context(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let creator_id = match req.headers().get(CREATOR_HEADER) {
        None => state.config.demo_creator_id,
        Some(value) => value
            .to_str()
            .ok()
            .and_then(|v| Uuid::parse_str(v.trim()).ok())
            .ok_or_else(|| {
                ApiError(
                    format!("Invalid {} header: expected a UUID", CREATOR_HEADER),
                    StatusCode::BAD_REQUEST,
                )
            })?,
    };

    req.extensions_mut().insert(CreatorContext { creator_id });
    Ok(next.run(req).await)
}
