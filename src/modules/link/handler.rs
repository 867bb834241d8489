use super::dto::{IngestLinksRequest, IngestLinksResponse, LinkAssetEnvelope};
use super::service::LinkService;
use crate::common::response::{ApiError, ApiResponse, ApiSuccess};
use crate::middleware::creator::CreatorContext;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

/// Ingest a batch of video links
#[utoipa::path(
    post,
    path = "/api/v1/links/ingest",
    request_body = IngestLinksRequest,
    params(
        ("x-creator-id" = Option<Uuid>, Header, description = "Creator on whose behalf links are ingested")
    ),
    responses(
        (status = 200, description = "Assets created or found, in request order", body = ApiResponse<IngestLinksResponse>),
        (status = 400, description = "Invalid payload or URL"),
        (status = 503, description = "Storage unavailable")
    ),
    tag = "Links"
)]
pub async fn ingest_links(
    State(state): State<AppState>,
    Extension(ctx): Extension<CreatorContext>,
    Json(payload): Json<IngestLinksRequest>,
) -> impl IntoResponse {
    if let Err(e) = payload.validate() {
        return ApiError::invalid_payload(&e).into_response();
    }

    match LinkService::ingest(&state, ctx.creator_id, &payload.urls).await {
        Ok(assets) => ApiSuccess(
            ApiResponse::success(IngestLinksResponse { assets }, "Links ingested successfully"),
            StatusCode::OK,
        )
        .into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Get link asset by ID
#[utoipa::path(
    get,
    path = "/api/v1/links/{id}",
    params(
        ("id" = Uuid, Path, description = "Link asset ID")
    ),
    responses(
        (status = 200, description = "Link asset details", body = ApiResponse<LinkAssetEnvelope>),
        (status = 404, description = "Link asset not found")
    ),
    tag = "Links"
)]
pub async fn get_link(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    match LinkService::find_by_id(&state, id).await {
        Ok(asset) => ApiSuccess(
            ApiResponse::success(LinkAssetEnvelope { asset }, "Link asset retrieved successfully"),
            StatusCode::OK,
        )
        .into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}
