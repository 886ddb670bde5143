use crate::models::question::{DifficultyLevel, QuestionType};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateQuestionPayload {
    pub exam_id: Uuid,
    #[validate(length(min = 1))]
    pub question_text: String,
    pub question_type: QuestionType,
    /// Answer key; shape depends on question_type and is not validated here.
    pub expected_answer: JsonValue,
    #[validate(range(min = 0.0))]
    pub marks: f64,
    pub order: Option<i32>,
    pub difficulty_level: Option<DifficultyLevel>,
    pub topic: Option<String>,
    pub grading_criteria: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateQuestionPayload {
    #[serde(default, deserialize_with = "super::exam_dto::trim_optional_string")]
    pub question_text: Option<String>,
    pub question_type: Option<QuestionType>,
    pub expected_answer: Option<JsonValue>,
    #[validate(range(min = 0.0))]
    pub marks: Option<f64>,
    pub order: Option<i32>,
    pub difficulty_level: Option<DifficultyLevel>,
    pub topic: Option<String>,
    pub grading_criteria: Option<String>,
}
