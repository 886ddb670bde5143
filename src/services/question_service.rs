use crate::dto::question_dto::{CreateQuestionPayload, UpdateQuestionPayload};
use crate::error::Result;
use crate::models::question::Question;
use crate::services::exam_service::decimal_marks;
use crate::utils::validation::validate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct QuestionService {
    pool: PgPool,
}

impl QuestionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_question(&self, payload: CreateQuestionPayload) -> Result<Question> {
        validate(&payload)?;

        let marks = decimal_marks(payload.marks, "marks")?;

        let question = sqlx::query_as::<_, Question>(
            r#"
            INSERT INTO questions (
                exam_id, question_text, question_type, expected_answer, marks,
                "order", difficulty_level, topic, grading_criteria
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(payload.exam_id)
        .bind(payload.question_text)
        .bind(payload.question_type)
        .bind(payload.expected_answer)
        .bind(marks)
        .bind(payload.order)
        .bind(payload.difficulty_level)
        .bind(payload.topic)
        .bind(payload.grading_criteria)
        .fetch_one(&self.pool)
        .await?;

        Ok(question)
    }

    pub async fn get_question_by_id(&self, question_id: Uuid) -> Result<Question> {
        let question = sqlx::query_as::<_, Question>(r#"SELECT * FROM questions WHERE id = $1"#)
            .bind(question_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(question)
    }

    pub async fn update_question(
        &self,
        question_id: Uuid,
        payload: UpdateQuestionPayload,
    ) -> Result<Question> {
        validate(&payload)?;

        let marks = payload
            .marks
            .map(|m| decimal_marks(m, "marks"))
            .transpose()?;

        let question = sqlx::query_as::<_, Question>(
            r#"
            UPDATE questions
            SET
                question_text = COALESCE($1, question_text),
                question_type = COALESCE($2, question_type),
                expected_answer = COALESCE($3, expected_answer),
                marks = COALESCE($4, marks),
                "order" = COALESCE($5, "order"),
                difficulty_level = COALESCE($6, difficulty_level),
                topic = COALESCE($7, topic),
                grading_criteria = COALESCE($8, grading_criteria),
                updated_at = NOW()
            WHERE id = $9
            RETURNING *
            "#,
        )
        .bind(payload.question_text)
        .bind(payload.question_type)
        .bind(payload.expected_answer)
        .bind(marks)
        .bind(payload.order)
        .bind(payload.difficulty_level)
        .bind(payload.topic)
        .bind(payload.grading_criteria)
        .bind(question_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(question)
    }

    /// Exam's questions in presentation order: "order" first (NULLs last),
    /// then id as the tiebreaker. "order" values may repeat or gap.
    pub async fn list_questions_for_exam(&self, exam_id: Uuid) -> Result<Vec<Question>> {
        let questions = sqlx::query_as::<_, Question>(
            r#"
            SELECT * FROM questions
            WHERE exam_id = $1
            ORDER BY "order" ASC NULLS LAST, id ASC
            "#,
        )
        .bind(exam_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(questions)
    }

    /// Sum of question marks for an exam; the authoring dashboard compares
    /// this against the exam's declared total_marks.
    pub async fn sum_marks_for_exam(&self, exam_id: Uuid) -> Result<Decimal> {
        let sum: Option<Decimal> =
            sqlx::query_scalar(r#"SELECT SUM(marks) FROM questions WHERE exam_id = $1"#)
                .bind(exam_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(sum.unwrap_or_default())
    }

    pub async fn count_for_exam(&self, exam_id: Uuid) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar(r#"SELECT COUNT(*) FROM questions WHERE exam_id = $1"#)
                .bind(exam_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    pub async fn delete_question(&self, question_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(question_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
