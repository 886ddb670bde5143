pub mod answer_service;
pub mod exam_service;
pub mod question_service;
pub mod submission_service;
