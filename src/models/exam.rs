use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "exam_status", rename_all = "snake_case")]
pub enum ExamStatus {
    Draft,
    Published,
    Archived,
}

/// An assessment definition: timing, scoring thresholds and an optional
/// availability window. Status transitions are owned by an external
/// workflow service; nothing here polices them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Exam {
    pub id: Uuid,
    pub title: String,
    pub duration_minutes: i32,
    pub course: String,
    pub description: Option<String>,
    pub total_marks: rust_decimal::Decimal,
    pub passing_score: rust_decimal::Decimal,
    pub start_datetime: Option<DateTime<Utc>>,
    pub end_datetime: Option<DateTime<Utc>>,
    pub instructions: Option<String>,
    pub status: ExamStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
