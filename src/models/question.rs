use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::{FromRow, Type};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "question_type", rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    TrueFalse,
    ShortAnswer,
    Essay,
    FillBlank,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "difficulty_level", rename_all = "snake_case")]
pub enum DifficultyLevel {
    Easy,
    Medium,
    Hard,
}

/// One assessable item within an exam.
///
/// `expected_answer` is schemaless JSON whose shape depends on
/// `question_type`; interpretation belongs to the grading service, not the
/// storage layer. `order` is a sequence hint only: neither unique nor
/// contiguous within an exam.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub id: Uuid,
    pub exam_id: Uuid,
    pub question_text: String,
    pub question_type: QuestionType,
    pub expected_answer: JsonValue,
    pub marks: rust_decimal::Decimal,
    pub order: Option<i32>,
    pub difficulty_level: Option<DifficultyLevel>,
    pub topic: Option<String>,
    pub grading_criteria: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
