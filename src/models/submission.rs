use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::{FromRow, Type};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "grading_status", rename_all = "snake_case")]
pub enum GradingStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

/// One student's timed attempt at an exam.
///
/// `time_taken` is derived once at insert from `submit_time - start_time`
/// when not supplied, and never recomputed afterwards. A later correction
/// to `submit_time` leaves it stale unless the caller overwrites it
/// explicitly — known inconsistency risk, kept as-is.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Submission {
    pub id: Uuid,
    pub student_id: Uuid,
    pub exam_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub submit_time: DateTime<Utc>,
    pub grade: Option<rust_decimal::Decimal>,
    pub grading_status: GradingStatus,
    pub grading_feedback: Option<JsonValue>,
    pub time_taken: Option<i32>,
    pub ip_address: Option<sqlx::types::ipnetwork::IpNetwork>,
    pub user_agent: Option<String>,
    pub attempt_number: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
