use crate::dto::answer_dto::{CreateAnswerPayload, UpdateAnswerPayload};
use crate::error::Result;
use crate::models::answer::Answer;
use crate::services::exam_service::decimal_marks;
use crate::utils::validation::validate;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct AnswerService {
    pool: PgPool,
}

impl AnswerService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A second answer for the same (submission, question) pair surfaces as
    /// `Error::Conflict` from the database constraint.
    pub async fn create_answer(&self, payload: CreateAnswerPayload) -> Result<Answer> {
        validate(&payload)?;

        let marks_awarded = payload
            .marks_awarded
            .map(|m| decimal_marks(m, "marks awarded"))
            .transpose()?;

        let answer = sqlx::query_as::<_, Answer>(
            r#"
            INSERT INTO answers (
                submission_id, question_id, student_answer, marks_awarded, feedback
            )
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(payload.submission_id)
        .bind(payload.question_id)
        .bind(payload.student_answer)
        .bind(marks_awarded)
        .bind(payload.feedback)
        .fetch_one(&self.pool)
        .await?;

        Ok(answer)
    }

    pub async fn get_answer_by_id(&self, answer_id: Uuid) -> Result<Answer> {
        let answer = sqlx::query_as::<_, Answer>(r#"SELECT * FROM answers WHERE id = $1"#)
            .bind(answer_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(answer)
    }

    pub async fn update_answer(
        &self,
        answer_id: Uuid,
        payload: UpdateAnswerPayload,
    ) -> Result<Answer> {
        validate(&payload)?;

        let marks_awarded = payload
            .marks_awarded
            .map(|m| decimal_marks(m, "marks awarded"))
            .transpose()?;

        let answer = sqlx::query_as::<_, Answer>(
            r#"
            UPDATE answers
            SET
                student_answer = COALESCE($1, student_answer),
                marks_awarded = COALESCE($2, marks_awarded),
                feedback = COALESCE($3, feedback),
                updated_at = NOW()
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(payload.student_answer)
        .bind(marks_awarded)
        .bind(payload.feedback)
        .bind(answer_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(answer)
    }

    /// Answers of one submission in the owning questions' presentation
    /// order ("order" then question id), matching how the exam is shown.
    pub async fn list_answers_for_submission(&self, submission_id: Uuid) -> Result<Vec<Answer>> {
        let answers = sqlx::query_as::<_, Answer>(
            r#"
            SELECT a.* FROM answers a
            JOIN questions q ON q.id = a.question_id
            WHERE a.submission_id = $1
            ORDER BY q."order" ASC NULLS LAST, q.id ASC
            "#,
        )
        .bind(submission_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(answers)
    }

    pub async fn delete_answer(&self, answer_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM answers WHERE id = $1")
            .bind(answer_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
