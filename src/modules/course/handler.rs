use super::dto::{ComposeCourseRequest, CourseEnvelope};
use super::service::CourseService;
use crate::common::response::{ApiError, ApiResponse, ApiSuccess};
use crate::middleware::creator::CreatorContext;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use validator::Validate;

/// Compose a draft course from ingested links
#[utoipa::path(
    post,
    path = "/api/v1/courses/compose",
    request_body = ComposeCourseRequest,
    params(
        ("x-creator-id" = Option<uuid::Uuid>, Header, description = "Creator who owns the link assets")
    ),
    responses(
        (status = 201, description = "Course draft created", body = ApiResponse<CourseEnvelope>),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "None of the link assets belong to the creator"),
        (status = 503, description = "Storage unavailable")
    ),
    tag = "Courses"
)]
pub async fn compose_course(
    State(state): State<AppState>,
    Extension(ctx): Extension<CreatorContext>,
    Json(payload): Json<ComposeCourseRequest>,
) -> impl IntoResponse {
    if let Err(e) = payload.validate() {
        return ApiError::invalid_payload(&e).into_response();
    }

    match CourseService::compose(&state, ctx.creator_id, &payload).await {
        Ok(course) => ApiSuccess(
            ApiResponse::success(CourseEnvelope { course }, "Course draft composed successfully"),
            StatusCode::CREATED,
        )
        .into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Get course outline by slug
#[utoipa::path(
    get,
    path = "/api/v1/courses/{slug}",
    params(
        ("slug" = String, Path, description = "Course slug")
    ),
    responses(
        (status = 200, description = "Course outline", body = ApiResponse<CourseEnvelope>),
        (status = 404, description = "Course not found")
    ),
    tag = "Courses"
)]
pub async fn get_course(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> impl IntoResponse {
    match CourseService::find_by_slug(&state, &slug).await {
        Ok(course) => ApiSuccess(
            ApiResponse::success(CourseEnvelope { course }, "Course retrieved successfully"),
            StatusCode::OK,
        )
        .into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}
