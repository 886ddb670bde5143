use crate::dto::submission_dto::{CreateSubmissionPayload, UpdateSubmissionPayload};
use crate::error::Result;
use crate::models::submission::{GradingStatus, Submission};
use crate::services::exam_service::{decimal_marks, total_pages};
use crate::utils::time::elapsed_whole_seconds;
use crate::utils::validation::validate;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, serde::Serialize)]
pub struct PaginatedSubmissions {
    #[serde(rename = "items")]
    pub submissions: Vec<Submission>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

#[derive(Clone)]
pub struct SubmissionService {
    pool: PgPool,
}

impl SubmissionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a submission. When `time_taken` is not supplied it is derived
    /// here, once, from submit_time - start_time; later timestamp edits do
    /// not recompute it. A duplicate (student, exam, attempt_number) write
    /// surfaces as `Error::Conflict`.
    pub async fn create_submission(&self, payload: CreateSubmissionPayload) -> Result<Submission> {
        validate(&payload)?;

        let grade = payload
            .grade
            .map(|g| decimal_marks(g, "grade"))
            .transpose()?;

        let time_taken = payload.time_taken.or_else(|| {
            let derived = elapsed_whole_seconds(payload.start_time, payload.submit_time) as i32;
            tracing::debug!(derived, "derived time_taken from submission window");
            Some(derived)
        });

        let submission = sqlx::query_as::<_, Submission>(
            r#"
            INSERT INTO submissions (
                student_id, exam_id, start_time, submit_time, grade, grading_status,
                grading_feedback, time_taken, ip_address, user_agent, attempt_number
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(payload.student_id)
        .bind(payload.exam_id)
        .bind(payload.start_time)
        .bind(payload.submit_time)
        .bind(grade)
        .bind(payload.grading_status.unwrap_or(GradingStatus::Pending))
        .bind(payload.grading_feedback)
        .bind(time_taken)
        .bind(payload.ip_address)
        .bind(payload.user_agent)
        .bind(payload.attempt_number)
        .fetch_one(&self.pool)
        .await?;

        Ok(submission)
    }

    pub async fn get_submission_by_id(&self, submission_id: Uuid) -> Result<Submission> {
        let submission =
            sqlx::query_as::<_, Submission>(r#"SELECT * FROM submissions WHERE id = $1"#)
                .bind(submission_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(submission)
    }

    /// Partial update used by the external grading workflow. An existing
    /// time_taken is kept unless the caller sends a replacement.
    pub async fn update_submission(
        &self,
        submission_id: Uuid,
        payload: UpdateSubmissionPayload,
    ) -> Result<Submission> {
        validate(&payload)?;

        let grade = payload
            .grade
            .map(|g| decimal_marks(g, "grade"))
            .transpose()?;

        let submission = sqlx::query_as::<_, Submission>(
            r#"
            UPDATE submissions
            SET
                start_time = COALESCE($1, start_time),
                submit_time = COALESCE($2, submit_time),
                grade = COALESCE($3, grade),
                grading_status = COALESCE($4, grading_status),
                grading_feedback = COALESCE($5, grading_feedback),
                time_taken = COALESCE($6, time_taken),
                ip_address = COALESCE($7, ip_address),
                user_agent = COALESCE($8, user_agent),
                updated_at = NOW()
            WHERE id = $9
            RETURNING *
            "#,
        )
        .bind(payload.start_time)
        .bind(payload.submit_time)
        .bind(grade)
        .bind(payload.grading_status)
        .bind(payload.grading_feedback)
        .bind(payload.time_taken)
        .bind(payload.ip_address)
        .bind(payload.user_agent)
        .bind(submission_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(submission)
    }

    /// Per-exam grading queue: newest submit_time first, optionally narrowed
    /// to one grading status. Backed by the (exam_id, grading_status) index.
    pub async fn list_submissions_for_exam(
        &self,
        exam_id: Uuid,
        grading_status: Option<GradingStatus>,
        page: i64,
        per_page: i64,
    ) -> Result<PaginatedSubmissions> {
        let offset = (page - 1) * per_page;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM submissions
            WHERE exam_id = $1
              AND ($2::grading_status IS NULL OR grading_status = $2)
            "#,
        )
        .bind(exam_id)
        .bind(grading_status)
        .fetch_one(&self.pool)
        .await?;

        let submissions = sqlx::query_as::<_, Submission>(
            r#"
            SELECT * FROM submissions
            WHERE exam_id = $1
              AND ($2::grading_status IS NULL OR grading_status = $2)
            ORDER BY submit_time DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(exam_id)
        .bind(grading_status)
        .bind(per_page)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(PaginatedSubmissions {
            submissions,
            total,
            page,
            per_page,
            total_pages: total_pages(total, per_page),
        })
    }

    /// A student's attempt history across exams, newest first.
    pub async fn list_submissions_for_student(
        &self,
        student_id: Uuid,
        exam_id: Option<Uuid>,
    ) -> Result<Vec<Submission>> {
        let submissions = sqlx::query_as::<_, Submission>(
            r#"
            SELECT * FROM submissions
            WHERE student_id = $1
              AND ($2::uuid IS NULL OR exam_id = $2)
            ORDER BY submit_time DESC
            "#,
        )
        .bind(student_id)
        .bind(exam_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(submissions)
    }

    /// Next free attempt ordinal for (student, exam). Read helper only:
    /// retake limits are the caller's policy.
    pub async fn next_attempt_number(&self, student_id: Uuid, exam_id: Uuid) -> Result<i32> {
        let max: Option<i32> = sqlx::query_scalar(
            r#"SELECT MAX(attempt_number) FROM submissions WHERE student_id = $1 AND exam_id = $2"#,
        )
        .bind(student_id)
        .bind(exam_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(max.unwrap_or(0) + 1)
    }

    pub async fn delete_submission(&self, submission_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM submissions WHERE id = $1")
            .bind(submission_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
