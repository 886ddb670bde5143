use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateAnswerPayload {
    pub submission_id: Uuid,
    pub question_id: Uuid,
    /// Shape depends on the question type; stored as-is.
    pub student_answer: JsonValue,
    #[validate(range(min = 0.0))]
    pub marks_awarded: Option<f64>,
    pub feedback: Option<String>,
}

/// Grading write path: score and feedback, or a corrected answer value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateAnswerPayload {
    pub student_answer: Option<JsonValue>,
    #[validate(range(min = 0.0))]
    pub marks_awarded: Option<f64>,
    pub feedback: Option<String>,
}
