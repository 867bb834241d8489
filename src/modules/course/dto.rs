use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::model::{Course, CourseDraft, CourseModule, Difficulty, KeyPoint, Lesson};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComposeCourseRequest {
    #[validate(length(min = 1, message = "At least one link asset id is required"))]
    pub link_asset_ids: Vec<Uuid>,
    #[validate(length(min = 3, max = 120, message = "Title must be 3 to 120 characters"))]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LessonOutline {
    pub id: Uuid,
    pub module_id: Uuid,
    pub index: i32,
    pub title: String,
    pub summary: Option<String>,
    pub key_points: Vec<KeyPoint>,
    pub difficulty: Option<Difficulty>,
    pub est_minutes: Option<i32>,
    pub link_asset_id: Option<Uuid>,
}

impl From<Lesson> for LessonOutline {
    fn from(l: Lesson) -> Self {
        Self {
            id: l.id,
            module_id: l.module_id,
            index: l.index,
            title: l.title,
            summary: l.summary,
            key_points: l.key_points.0,
            difficulty: Some(l.difficulty),
            est_minutes: Some(l.est_minutes),
            link_asset_id: l.link_asset_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModuleOutline {
    pub id: Uuid,
    pub index: i32,
    pub title: String,
    pub description: Option<String>,
    pub lessons: Vec<LessonOutline>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseOutline {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub cover_url: Option<String>,
    pub is_paid: bool,
    pub price_cents: Option<i32>,
    pub currency: Option<String>,
    pub modules: Vec<ModuleOutline>,
}

impl CourseOutline {
    /// Builds the read model from loose rows. Modules and lessons are
    /// sorted by index regardless of the order they arrive in.
    pub fn assemble(course: Course, mut modules: Vec<CourseModule>, lessons: Vec<Lesson>) -> Self {
        modules.sort_by_key(|m| m.index);

        let mut outlines: Vec<ModuleOutline> = modules
            .into_iter()
            .map(|m| ModuleOutline {
                id: m.id,
                index: m.index,
                title: m.title,
                description: m.description,
                lessons: Vec::new(),
            })
            .collect();

        for lesson in lessons {
            if let Some(module) = outlines.iter_mut().find(|m| m.id == lesson.module_id) {
                module.lessons.push(lesson.into());
            }
        }
        for module in &mut outlines {
            module.lessons.sort_by_key(|l| l.index);
        }

        Self {
            id: course.id,
            slug: course.slug,
            title: course.title,
            subtitle: course.subtitle,
            cover_url: course.cover_url,
            is_paid: course.is_paid,
            price_cents: course.price_cents,
            currency: course.currency,
            modules: outlines,
        }
    }
}

impl From<CourseDraft> for CourseOutline {
    fn from(draft: CourseDraft) -> Self {
        let (modules, lessons): (Vec<_>, Vec<_>) = draft
            .modules
            .into_iter()
            .map(|m| (m.module, m.lessons))
            .unzip();
        Self::assemble(draft.course, modules, lessons.into_iter().flatten().collect())
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CourseEnvelope {
    pub course: CourseOutline,
}
