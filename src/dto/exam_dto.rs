use crate::models::exam::ExamStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateExamPayload {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(range(min = 1, message = "Duration must be at least 1 minute"))]
    pub duration_minutes: i32,
    #[validate(length(min = 1))]
    pub course: String,
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    pub total_marks: f64,
    #[validate(range(min = 0.0))]
    pub passing_score: f64,
    pub start_datetime: Option<DateTime<Utc>>,
    pub end_datetime: Option<DateTime<Utc>>,
    pub instructions: Option<String>,
    pub status: Option<ExamStatus>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateExamPayload {
    // serde deserializer trims and converts empty strings to None
    #[serde(default, deserialize_with = "trim_optional_string")]
    pub title: Option<String>,

    #[validate(range(min = 1, message = "Duration must be at least 1 minute"))]
    pub duration_minutes: Option<i32>,

    #[serde(default, deserialize_with = "trim_optional_string")]
    pub course: Option<String>,

    pub description: Option<String>,

    #[validate(range(min = 0.0))]
    pub total_marks: Option<f64>,

    #[validate(range(min = 0.0))]
    pub passing_score: Option<f64>,

    pub start_datetime: Option<DateTime<Utc>>,
    pub end_datetime: Option<DateTime<Utc>>,
    pub instructions: Option<String>,
    pub status: Option<ExamStatus>,
}

pub(crate) fn trim_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }))
}
