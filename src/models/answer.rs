use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use uuid::Uuid;

/// A student's response to one question within one submission. At most one
/// answer per (submission, question), enforced by the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Answer {
    pub id: Uuid,
    pub submission_id: Uuid,
    pub question_id: Uuid,
    pub student_answer: JsonValue,
    pub marks_awarded: Option<rust_decimal::Decimal>,
    pub feedback: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
