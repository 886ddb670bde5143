pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

use crate::services::{
    answer_service::AnswerService, exam_service::ExamService, question_service::QuestionService,
    submission_service::SubmissionService,
};
use sqlx::PgPool;

/// Storage-layer aggregate: one service per entity, sharing a pool. The
/// external API/grading layers hold one of these.
#[derive(Clone)]
pub struct ExamStore {
    pub pool: PgPool,
    pub exam_service: ExamService,
    pub question_service: QuestionService,
    pub submission_service: SubmissionService,
    pub answer_service: AnswerService,
}

impl ExamStore {
    pub fn new(pool: PgPool) -> Self {
        let exam_service = ExamService::new(pool.clone());
        let question_service = QuestionService::new(pool.clone());
        let submission_service = SubmissionService::new(pool.clone());
        let answer_service = AnswerService::new(pool.clone());

        Self {
            pool,
            exam_service,
            question_service,
            submission_service,
            answer_service,
        }
    }
}
