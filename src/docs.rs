use utoipa::OpenApi;
use crate::modules::course::dto::*;
use crate::modules::link::dto::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::link::handler::ingest_links,
        crate::modules::link::handler::get_link,
        crate::modules::course::handler::compose_course,
        crate::modules::course::handler::get_course,
    ),
    components(
        schemas(
            IngestLinksRequest, IngestLinksResponse, LinkAssetResponse, LinkAssetEnvelope,
            ComposeCourseRequest, CourseEnvelope, CourseOutline, ModuleOutline, LessonOutline,
            crate::modules::link::model::LinkPlatform,
            crate::modules::link::model::LinkStatus,
            crate::modules::course::model::Difficulty,
            crate::modules::course::model::KeyPoint,
        )
    ),
    tags(
        (name = "Links", description = "Video link ingestion"),
        (name = "Courses", description = "Course composition and outlines")
    )
)]
pub struct ApiDoc;
