use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

impl TryFrom<String> for Difficulty {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            other => Err(format!("unknown difficulty '{}'", other)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
pub struct KeyPoint {
    pub label: String,
}

impl KeyPoint {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Course {
    pub id: Uuid,
    pub creator_id: Uuid,
    pub slug: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub cover_url: Option<String>,
    pub is_paid: bool,
    pub is_published: bool,
    pub price_cents: Option<i32>,
    pub currency: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, FromRow)]
pub struct CourseModule {
    pub id: Uuid,
    pub course_id: Uuid,
    pub index: i32,
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct Lesson {
    pub id: Uuid,
    pub course_id: Uuid,
    pub module_id: Uuid,
    pub link_asset_id: Option<Uuid>,
    pub index: i32,
    pub title: String,
    pub summary: Option<String>,
    pub key_points: Json<Vec<KeyPoint>>,
    #[sqlx(try_from = "String")]
    pub difficulty: Difficulty,
    pub est_minutes: i32,
}

/// A fully planned course tree, written in one transaction.
#[derive(Debug, Clone)]
pub struct CourseDraft {
    pub course: Course,
    pub modules: Vec<ModuleDraft>,
}

#[derive(Debug, Clone)]
pub struct ModuleDraft {
    pub module: CourseModule,
    pub lessons: Vec<Lesson>,
}

impl CourseDraft {
    pub fn lessons(&self) -> impl Iterator<Item = &Lesson> {
        self.modules.iter().flat_map(|m| m.lessons.iter())
    }

    /// Same draft under a different slug, used when the slug lost a race.
    pub fn with_slug(mut self, slug: String) -> Self {
        self.course.slug = slug;
        self
    }
}
