use sqlx::types::Json;
use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use super::dto::{ComposeCourseRequest, CourseOutline};
use super::heuristics::{
    course_subtitle, course_title, estimate_minutes, group_into_modules, infer_difficulty,
    lesson_key_points, lesson_summary, lesson_title, ComposerRules,
};
use super::model::{Course, CourseDraft, CourseModule, Lesson, ModuleDraft};
use super::repository::CourseRepository;
use super::slug::{allocate_slug, disambiguate, slugify};
use crate::common::error::AppError;
use crate::infrastructure::queue::job::{CourseComposeJob, SummarizeJob};
use crate::modules::link::model::LinkAsset;
use crate::modules::link::repository::LinkRepository;
use crate::state::AppState;

const MAX_SLUG_ATTEMPTS: usize = 5;
const DEFAULT_CURRENCY: &str = "usd";

pub struct CourseService;

impl CourseService {
    /// Builds a draft course from the creator's link assets and persists the
    /// whole tree. Summarize jobs are dispatched only after the tree is
    /// committed, so a worker never sees a lesson that is not stored yet.
    pub async fn compose(
        state: &AppState,
        creator_id: Uuid,
        req: &ComposeCourseRequest,
    ) -> Result<CourseOutline, AppError> {
        let assets = state
            .db
            .find_for_creator(creator_id, &req.link_asset_ids)
            .await?;
        if assets.is_empty() {
            return Err(AppError::NotFound("Link assets".into()));
        }

        let rules = &state.config.composer;
        let title = req
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| course_title(&assets, rules));

        let base = slugify(&title);
        let mut draft = plan_course(creator_id, title, &assets, rules);
        draft.course.slug = allocate_slug(state.db.as_ref(), &base).await?;

        let mut attempt = 1;
        loop {
            let inserted = state.db.insert_course_tree(&draft).await;
            match inserted {
                Ok(()) => break,
                Err(AppError::Conflict(reason)) if attempt < MAX_SLUG_ATTEMPTS => {
                    warn!(slug = %draft.course.slug, attempt, %reason, "Slug taken, retrying");
                    let seed = if base.is_empty() { "course" } else { base.as_str() };
                    draft = draft.with_slug(disambiguate(seed));
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            course_id = %draft.course.id,
            slug = %draft.course.slug,
            modules = draft.modules.len(),
            lessons = draft.lessons().count(),
            "Course draft composed"
        );

        for lesson in draft.lessons() {
            state
                .dispatcher
                .dispatch(&SummarizeJob {
                    course_id: lesson.course_id,
                    lesson_id: lesson.id,
                })
                .await;
        }
        state
            .dispatcher
            .dispatch(&CourseComposeJob {
                course_id: draft.course.id,
            })
            .await;

        Ok(draft.into())
    }

    pub async fn find_by_slug(state: &AppState, slug: &str) -> Result<CourseOutline, AppError> {
        state
            .db
            .find_outline_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::NotFound("Course".into()))
    }
}

/// Lays out modules and lessons for `assets` in memory. The slug is left
/// empty for the caller to allocate.
fn plan_course(
    creator_id: Uuid,
    title: String,
    assets: &[LinkAsset],
    rules: &ComposerRules,
) -> CourseDraft {
    let now = OffsetDateTime::now_utc();
    let course_id = Uuid::new_v4();

    let course = Course {
        id: course_id,
        creator_id,
        slug: String::new(),
        title,
        subtitle: Some(course_subtitle(assets)),
        cover_url: None,
        is_paid: false,
        is_published: false,
        price_cents: None,
        currency: Some(DEFAULT_CURRENCY.to_string()),
        created_at: now,
        updated_at: now,
    };

    let modules = group_into_modules(assets, rules)
        .into_iter()
        .enumerate()
        .map(|(module_index, bucket)| {
            let module = CourseModule {
                id: Uuid::new_v4(),
                course_id,
                index: module_index as i32,
                title: bucket.title,
                description: bucket.description,
            };

            let lessons = bucket
                .assets
                .iter()
                .enumerate()
                .map(|(lesson_index, asset)| Lesson {
                    id: Uuid::new_v4(),
                    course_id,
                    module_id: module.id,
                    link_asset_id: Some(asset.id),
                    index: lesson_index as i32,
                    title: lesson_title(asset, lesson_index + 1),
                    summary: lesson_summary(asset, rules),
                    key_points: Json(lesson_key_points(asset, rules)),
                    difficulty: infer_difficulty(asset.title.as_deref()),
                    est_minutes: estimate_minutes(asset.duration_sec, rules),
                })
                .collect();

            ModuleDraft { module, lessons }
        })
        .collect();

    CourseDraft { course, modules }
}
