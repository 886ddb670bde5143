use crate::dto::exam_dto::{CreateExamPayload, UpdateExamPayload};
use crate::error::{Error, Result};
use crate::models::exam::{Exam, ExamStatus};
use crate::utils::validation::validate;
use chrono::{DateTime, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, serde::Serialize)]
pub struct PaginatedExams {
    #[serde(rename = "items")]
    pub exams: Vec<Exam>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

#[derive(Debug, Default)]
pub struct ExamFilter {
    pub status: Option<ExamStatus>,
    pub course: Option<String>,
    pub search: Option<String>,
}

#[derive(Clone)]
pub struct ExamService {
    pool: PgPool,
}

impl ExamService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_exam(&self, payload: CreateExamPayload) -> Result<Exam> {
        validate(&payload)?;

        let total_marks = decimal_marks(payload.total_marks, "total marks")?;
        let passing_score = decimal_marks(payload.passing_score, "passing score")?;

        let exam = sqlx::query_as::<_, Exam>(
            r#"
            INSERT INTO exams (
                title, duration_minutes, course, description, total_marks,
                passing_score, start_datetime, end_datetime, instructions, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(payload.title)
        .bind(payload.duration_minutes)
        .bind(payload.course)
        .bind(payload.description)
        .bind(total_marks)
        .bind(passing_score)
        .bind(payload.start_datetime)
        .bind(payload.end_datetime)
        .bind(payload.instructions)
        .bind(payload.status.unwrap_or(ExamStatus::Draft))
        .fetch_one(&self.pool)
        .await?;

        Ok(exam)
    }

    pub async fn get_exam_by_id(&self, exam_id: Uuid) -> Result<Exam> {
        let exam = sqlx::query_as::<_, Exam>(r#"SELECT * FROM exams WHERE id = $1"#)
            .bind(exam_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exam)
    }

    pub async fn update_exam(&self, exam_id: Uuid, payload: UpdateExamPayload) -> Result<Exam> {
        validate(&payload)?;

        let total_marks = payload
            .total_marks
            .map(|m| decimal_marks(m, "total marks"))
            .transpose()?;
        let passing_score = payload
            .passing_score
            .map(|m| decimal_marks(m, "passing score"))
            .transpose()?;

        let exam = sqlx::query_as::<_, Exam>(
            r#"
            UPDATE exams
            SET
                title = COALESCE($1, title),
                duration_minutes = COALESCE($2, duration_minutes),
                course = COALESCE($3, course),
                description = COALESCE($4, description),
                total_marks = COALESCE($5, total_marks),
                passing_score = COALESCE($6, passing_score),
                start_datetime = COALESCE($7, start_datetime),
                end_datetime = COALESCE($8, end_datetime),
                instructions = COALESCE($9, instructions),
                status = COALESCE($10, status),
                updated_at = NOW()
            WHERE id = $11
            RETURNING *
            "#,
        )
        .bind(payload.title)
        .bind(payload.duration_minutes)
        .bind(payload.course)
        .bind(payload.description)
        .bind(total_marks)
        .bind(passing_score)
        .bind(payload.start_datetime)
        .bind(payload.end_datetime)
        .bind(payload.instructions)
        .bind(payload.status)
        .bind(exam_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exam)
    }

    /// Newest-created first; optional status/course/search narrowing.
    pub async fn list_exams(
        &self,
        page: i64,
        per_page: i64,
        filter: Option<ExamFilter>,
    ) -> Result<PaginatedExams> {
        let offset = (page - 1) * per_page;
        let filter = filter.unwrap_or_default();

        let status_param: Option<ExamStatus> = filter.status;
        let course_param: Option<String> = filter.course;
        let search_param: Option<String> = filter.search.map(|s| format!("%{}%", s));

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM exams
            WHERE ($1::exam_status IS NULL OR status = $1)
              AND ($2::text IS NULL OR course = $2)
              AND ($3::text IS NULL OR (title ILIKE $3 OR description ILIKE $3 OR course ILIKE $3))
            "#,
        )
        .bind(status_param)
        .bind(course_param.clone())
        .bind(search_param.clone())
        .fetch_one(&self.pool)
        .await?;

        let exams = sqlx::query_as::<_, Exam>(
            r#"
            SELECT * FROM exams
            WHERE ($1::exam_status IS NULL OR status = $1)
              AND ($2::text IS NULL OR course = $2)
              AND ($3::text IS NULL OR (title ILIKE $3 OR description ILIKE $3 OR course ILIKE $3))
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(status_param)
        .bind(course_param)
        .bind(search_param)
        .bind(per_page)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(PaginatedExams {
            exams,
            total,
            page,
            per_page,
            total_pages: total_pages(total, per_page),
        })
    }

    /// Published exams whose availability window contains `now`. A NULL
    /// bound leaves that side of the window open.
    pub async fn list_available(&self, now: DateTime<Utc>) -> Result<Vec<Exam>> {
        let exams = sqlx::query_as::<_, Exam>(
            r#"
            SELECT * FROM exams
            WHERE status = 'published'
              AND (start_datetime IS NULL OR start_datetime <= $1)
              AND (end_datetime IS NULL OR end_datetime > $1)
            ORDER BY start_datetime ASC NULLS LAST, created_at DESC
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(exams)
    }

    /// Cascades through questions and submissions down to answers.
    pub async fn delete_exam(&self, exam_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM exams WHERE id = $1")
            .bind(exam_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

pub(crate) fn decimal_marks(value: f64, what: &str) -> Result<Decimal> {
    Decimal::from_f64(value).ok_or_else(|| Error::Anyhow(anyhow::anyhow!("Invalid {}", what)))
}

pub(crate) fn total_pages(total: i64, per_page: i64) -> i64 {
    if per_page > 0 {
        ((total as f64) / (per_page as f64)).ceil() as i64
    } else {
        1
    }
}
