use async_trait::async_trait;
use sqlx::types::Json;
use uuid::Uuid;

use super::dto::CourseOutline;
use super::model::{Course, CourseDraft, CourseModule, KeyPoint, Lesson};
use crate::common::error::AppError;
use crate::infrastructure::db::pool::PgStore;

#[async_trait]
pub trait CourseRepository: Send + Sync {
    async fn slug_exists(&self, slug: &str) -> Result<bool, AppError>;

    /// Writes course, modules and lessons atomically. A taken slug
    /// surfaces as [`AppError::Conflict`] and nothing is written.
    async fn insert_course_tree(&self, draft: &CourseDraft) -> Result<(), AppError>;

    async fn find_lesson(&self, id: Uuid) -> Result<Option<Lesson>, AppError>;

    async fn find_lessons_by_asset(&self, link_asset_id: Uuid) -> Result<Vec<Lesson>, AppError>;

    /// Fills the summary and key points of a lesson without overwriting
    /// existing content.
    async fn apply_summary(
        &self,
        lesson_id: Uuid,
        summary: &str,
        key_points: &[KeyPoint],
    ) -> Result<Option<Lesson>, AppError>;

    /// `None` when the course does not exist.
    async fn count_lessons(&self, course_id: Uuid) -> Result<Option<i64>, AppError>;

    async fn find_outline_by_slug(&self, slug: &str) -> Result<Option<CourseOutline>, AppError>;
}

const LESSON_COLUMNS: &str = r#"
    id, course_id, module_id, link_asset_id, index, title, summary, key_points, difficulty, est_minutes
"#;

#[async_trait]
impl CourseRepository for PgStore {
    async fn slug_exists(&self, slug: &str) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM courses WHERE slug = $1)")
            .bind(slug)
            .fetch_one(self.pool())
            .await?;

        Ok(exists)
    }

    async fn insert_course_tree(&self, draft: &CourseDraft) -> Result<(), AppError> {
        let mut tx = self.pool().begin().await?;
        let course = &draft.course;

        sqlx::query(
            r#"
            INSERT INTO courses
                (id, creator_id, slug, title, subtitle, cover_url, is_paid, is_published, price_cents, currency)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(course.id)
        .bind(course.creator_id)
        .bind(&course.slug)
        .bind(&course.title)
        .bind(&course.subtitle)
        .bind(&course.cover_url)
        .bind(course.is_paid)
        .bind(course.is_published)
        .bind(course.price_cents)
        .bind(&course.currency)
        .execute(&mut *tx)
        .await?;

        for module in &draft.modules {
            let m = &module.module;
            sqlx::query(
                r#"
                INSERT INTO modules (id, course_id, index, title, description)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(m.id)
            .bind(m.course_id)
            .bind(m.index)
            .bind(&m.title)
            .bind(&m.description)
            .execute(&mut *tx)
            .await?;

            for lesson in &module.lessons {
                sqlx::query(
                    r#"
                    INSERT INTO lessons
                        (id, course_id, module_id, link_asset_id, index, title, summary, key_points, difficulty, est_minutes)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                    "#,
                )
                .bind(lesson.id)
                .bind(lesson.course_id)
                .bind(lesson.module_id)
                .bind(lesson.link_asset_id)
                .bind(lesson.index)
                .bind(&lesson.title)
                .bind(&lesson.summary)
                .bind(&lesson.key_points)
                .bind(lesson.difficulty.as_str())
                .bind(lesson.est_minutes)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok(())
    }

    async fn find_lesson(&self, id: Uuid) -> Result<Option<Lesson>, AppError> {
        let lesson = sqlx::query_as::<_, Lesson>(&format!(
            "SELECT {LESSON_COLUMNS} FROM lessons WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(lesson)
    }

    async fn find_lessons_by_asset(&self, link_asset_id: Uuid) -> Result<Vec<Lesson>, AppError> {
        let lessons = sqlx::query_as::<_, Lesson>(&format!(
            "SELECT {LESSON_COLUMNS} FROM lessons WHERE link_asset_id = $1 ORDER BY course_id, index"
        ))
        .bind(link_asset_id)
        .fetch_all(self.pool())
        .await?;

        Ok(lessons)
    }

    async fn apply_summary(
        &self,
        lesson_id: Uuid,
        summary: &str,
        key_points: &[KeyPoint],
    ) -> Result<Option<Lesson>, AppError> {
        // Single statement so concurrent summarize runs cannot blank each other out.
        let lesson = sqlx::query_as::<_, Lesson>(&format!(
            r#"
            UPDATE lessons
            SET
                summary = COALESCE(NULLIF(BTRIM(summary), ''), $1),
                key_points = CASE
                    WHEN jsonb_array_length(key_points) = 0 THEN $2
                    ELSE key_points
                END,
                updated_at = NOW()
            WHERE id = $3
            RETURNING {LESSON_COLUMNS}
            "#
        ))
        .bind(summary)
        .bind(Json(key_points))
        .bind(lesson_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(lesson)
    }

    async fn count_lessons(&self, course_id: Uuid) -> Result<Option<i64>, AppError> {
        let count: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT (SELECT COUNT(*) FROM lessons l WHERE l.course_id = c.id)
            FROM courses c
            WHERE c.id = $1
            "#,
        )
        .bind(course_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(count)
    }

    async fn find_outline_by_slug(&self, slug: &str) -> Result<Option<CourseOutline>, AppError> {
        let course = sqlx::query_as::<_, Course>(
            r#"
            SELECT id, creator_id, slug, title, subtitle, cover_url, is_paid, is_published,
                   price_cents, currency, created_at, updated_at
            FROM courses
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(self.pool())
        .await?;

        let Some(course) = course else {
            return Ok(None);
        };

        let modules = sqlx::query_as::<_, CourseModule>(
            "SELECT id, course_id, index, title, description FROM modules WHERE course_id = $1 ORDER BY index",
        )
        .bind(course.id)
        .fetch_all(self.pool())
        .await?;

        let lessons = sqlx::query_as::<_, Lesson>(&format!(
            "SELECT {LESSON_COLUMNS} FROM lessons WHERE course_id = $1 ORDER BY index"
        ))
        .bind(course.id)
        .fetch_all(self.pool())
        .await?;

        Ok(Some(CourseOutline::assemble(course, modules, lessons)))
    }
}
