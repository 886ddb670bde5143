use crate::models::submission::GradingStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::types::ipnetwork::IpNetwork;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateSubmissionPayload {
    pub student_id: Uuid,
    pub exam_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub submit_time: DateTime<Utc>,
    #[validate(range(min = 0.0))]
    pub grade: Option<f64>,
    pub grading_status: Option<GradingStatus>,
    pub grading_feedback: Option<JsonValue>,
    /// When absent, derived from submit_time - start_time at insert.
    pub time_taken: Option<i32>,
    pub ip_address: Option<IpNetwork>,
    pub user_agent: Option<String>,
    #[serde(default = "default_attempt_number")]
    #[validate(range(min = 1, message = "Attempt number starts at 1"))]
    pub attempt_number: i32,
}

fn default_attempt_number() -> i32 {
    1
}

/// Grading-side partial update. `time_taken` is only written when supplied
/// explicitly; a changed submit_time never triggers a recomputation.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateSubmissionPayload {
    pub start_time: Option<DateTime<Utc>>,
    pub submit_time: Option<DateTime<Utc>>,
    #[validate(range(min = 0.0))]
    pub grade: Option<f64>,
    pub grading_status: Option<GradingStatus>,
    pub grading_feedback: Option<JsonValue>,
    pub time_taken: Option<i32>,
    pub ip_address: Option<IpNetwork>,
    pub user_agent: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validation::validate;

    fn base_payload() -> CreateSubmissionPayload {
        let now = Utc::now();
        CreateSubmissionPayload {
            student_id: Uuid::new_v4(),
            exam_id: Uuid::new_v4(),
            start_time: now,
            submit_time: now,
            grade: None,
            grading_status: None,
            grading_feedback: None,
            time_taken: None,
            ip_address: None,
            user_agent: None,
            attempt_number: 1,
        }
    }

    #[test]
    fn rejects_zero_attempt_number() {
        let mut payload = base_payload();
        payload.attempt_number = 0;
        assert!(validate(&payload).is_err());
    }

    #[test]
    fn rejects_negative_grade() {
        let mut payload = base_payload();
        payload.grade = Some(-10.0);
        assert!(validate(&payload).is_err());
    }

    #[test]
    fn attempt_number_defaults_to_one() {
        let payload: CreateSubmissionPayload = serde_json::from_value(serde_json::json!({
            "student_id": Uuid::new_v4(),
            "exam_id": Uuid::new_v4(),
            "start_time": "2026-01-10T09:00:00Z",
            "submit_time": "2026-01-10T10:00:00Z",
        }))
        .unwrap();
        assert_eq!(payload.attempt_number, 1);
    }

    #[test]
    fn grading_status_uses_snake_case_names() {
        assert_eq!(
            serde_json::to_value(GradingStatus::InProgress).unwrap(),
            serde_json::json!("in_progress")
        );
    }
}
