//! Default retrieval orderings and list/aggregate read paths.
//! Requires DATABASE_URL; migrations run on setup.

use chrono::{Duration, Utc};
use exam_schema_backend::dto::exam_dto::{CreateExamPayload, UpdateExamPayload};
use exam_schema_backend::dto::question_dto::CreateQuestionPayload;
use exam_schema_backend::dto::submission_dto::CreateSubmissionPayload;
use exam_schema_backend::models::exam::ExamStatus;
use exam_schema_backend::models::question::QuestionType;
use exam_schema_backend::models::submission::GradingStatus;
use exam_schema_backend::services::exam_service::ExamFilter;
use exam_schema_backend::ExamStore;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

async fn setup_store() -> ExamStore {
    dotenvy::dotenv().ok();
    let _ = tracing_subscriber::fmt().with_env_filter("info").try_init();
    let _ = exam_schema_backend::config::init_config();
    let pool = exam_schema_backend::database::pool::create_pool()
        .await
        .expect("pool");
    exam_schema_backend::database::pool::run_migrations(&pool)
        .await
        .expect("migrations");
    ExamStore::new(pool)
}

async fn seed_student(pool: &PgPool) -> Uuid {
    sqlx::query_scalar::<_, Uuid>("INSERT INTO users DEFAULT VALUES RETURNING id")
        .fetch_one(pool)
        .await
        .expect("seed student")
}

fn exam_payload(title: &str, course: &str) -> CreateExamPayload {
    CreateExamPayload {
        title: title.to_string(),
        duration_minutes: 60,
        course: course.to_string(),
        description: None,
        total_marks: 100.0,
        passing_score: 40.0,
        start_datetime: None,
        end_datetime: None,
        instructions: None,
        status: Some(ExamStatus::Published),
    }
}

fn question_payload(exam_id: Uuid, text: &str, order: Option<i32>) -> CreateQuestionPayload {
    CreateQuestionPayload {
        exam_id,
        question_text: text.to_string(),
        question_type: QuestionType::ShortAnswer,
        expected_answer: serde_json::json!("answer"),
        marks: 2.5,
        order,
        difficulty_level: None,
        topic: None,
        grading_criteria: None,
    }
}

#[tokio::test]
async fn exams_list_newest_first_with_filters() {
    let store = setup_store().await;
    let course = format!("COURSE-{}", Uuid::new_v4());

    let older = store
        .exam_service
        .create_exam(exam_payload("Older", &course))
        .await
        .unwrap();
    let newer = store
        .exam_service
        .create_exam(exam_payload("Newer", &course))
        .await
        .unwrap();

    let listed = store
        .exam_service
        .list_exams(
            1,
            10,
            Some(ExamFilter {
                course: Some(course.clone()),
                ..Default::default()
            }),
        )
        .await
        .unwrap();
    assert_eq!(listed.total, 2);
    assert_eq!(listed.total_pages, 1);
    assert_eq!(listed.exams[0].id, newer.id);
    assert_eq!(listed.exams[1].id, older.id);

    let drafts = store
        .exam_service
        .list_exams(
            1,
            10,
            Some(ExamFilter {
                course: Some(course.clone()),
                status: Some(ExamStatus::Draft),
                ..Default::default()
            }),
        )
        .await
        .unwrap();
    assert_eq!(drafts.total, 0);

    store.exam_service.delete_exam(older.id).await.unwrap();
    store.exam_service.delete_exam(newer.id).await.unwrap();
}

#[tokio::test]
async fn availability_window_controls_listing() {
    let store = setup_store().await;
    let now = Utc::now();
    let course = format!("COURSE-{}", Uuid::new_v4());

    let mut open = exam_payload("Open", &course);
    open.start_datetime = Some(now - Duration::hours(1));
    open.end_datetime = Some(now + Duration::hours(1));
    let open = store.exam_service.create_exam(open).await.unwrap();

    let mut closed = exam_payload("Closed", &course);
    closed.start_datetime = Some(now - Duration::hours(3));
    closed.end_datetime = Some(now - Duration::hours(2));
    let closed = store.exam_service.create_exam(closed).await.unwrap();

    let available = store.exam_service.list_available(now).await.unwrap();
    let ids: Vec<Uuid> = available.iter().map(|e| e.id).collect();
    assert!(ids.contains(&open.id));
    assert!(!ids.contains(&closed.id));

    store.exam_service.delete_exam(open.id).await.unwrap();
    store.exam_service.delete_exam(closed.id).await.unwrap();
}

#[tokio::test]
async fn questions_order_by_sequence_then_id() {
    let store = setup_store().await;
    let exam = store
        .exam_service
        .create_exam(exam_payload("Ordering", "CS102"))
        .await
        .unwrap();

    let q_last = store
        .question_service
        .create_question(question_payload(exam.id, "no order", None))
        .await
        .unwrap();
    let q2 = store
        .question_service
        .create_question(question_payload(exam.id, "second", Some(2)))
        .await
        .unwrap();
    let q1 = store
        .question_service
        .create_question(question_payload(exam.id, "first", Some(1)))
        .await
        .unwrap();
    // Duplicate sequence numbers are allowed; id breaks the tie.
    let q2_dup = store
        .question_service
        .create_question(question_payload(exam.id, "second bis", Some(2)))
        .await
        .unwrap();

    let listed = store
        .question_service
        .list_questions_for_exam(exam.id)
        .await
        .unwrap();
    let ids: Vec<Uuid> = listed.iter().map(|q| q.id).collect();
    assert_eq!(ids[0], q1.id);
    assert_eq!(&ids[1..3], if q2.id < q2_dup.id { [q2.id, q2_dup.id] } else { [q2_dup.id, q2.id] });
    assert_eq!(ids[3], q_last.id);

    assert_eq!(store.question_service.count_for_exam(exam.id).await.unwrap(), 4);
    assert_eq!(
        store.question_service.sum_marks_for_exam(exam.id).await.unwrap(),
        Decimal::new(100, 1) // 4 x 2.5
    );

    store.exam_service.delete_exam(exam.id).await.unwrap();
}

#[tokio::test]
async fn submissions_list_newest_submit_first_and_filter_by_status() {
    let store = setup_store().await;
    let student = seed_student(&store.pool).await;
    let exam = store
        .exam_service
        .create_exam(exam_payload("Queue", "CS103"))
        .await
        .unwrap();

    let t0 = Utc::now() - Duration::hours(2);
    let mut first = CreateSubmissionPayload {
        student_id: student,
        exam_id: exam.id,
        start_time: t0,
        submit_time: t0 + Duration::minutes(30),
        grade: None,
        grading_status: None,
        grading_feedback: None,
        time_taken: None,
        ip_address: None,
        user_agent: None,
        attempt_number: 1,
    };
    let earlier = store
        .submission_service
        .create_submission(first.clone())
        .await
        .unwrap();

    first.attempt_number = 2;
    first.submit_time = t0 + Duration::minutes(90);
    first.grading_status = Some(GradingStatus::Completed);
    let later = store
        .submission_service
        .create_submission(first)
        .await
        .unwrap();

    let page = store
        .submission_service
        .list_submissions_for_exam(exam.id, None, 1, 10)
        .await
        .unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.submissions[0].id, later.id);
    assert_eq!(page.submissions[1].id, earlier.id);

    let pending = store
        .submission_service
        .list_submissions_for_exam(exam.id, Some(GradingStatus::Pending), 1, 10)
        .await
        .unwrap();
    assert_eq!(pending.total, 1);
    assert_eq!(pending.submissions[0].id, earlier.id);

    let history = store
        .submission_service
        .list_submissions_for_student(student, Some(exam.id))
        .await
        .unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].id, later.id);

    assert_eq!(
        store
            .submission_service
            .next_attempt_number(student, exam.id)
            .await
            .unwrap(),
        3
    );

    store.exam_service.delete_exam(exam.id).await.unwrap();
}

#[tokio::test]
async fn answers_follow_question_presentation_order() {
    let store = setup_store().await;
    let student = seed_student(&store.pool).await;
    let exam = store
        .exam_service
        .create_exam(exam_payload("Answer ordering", "CS105"))
        .await
        .unwrap();

    let q2 = store
        .question_service
        .create_question(question_payload(exam.id, "second", Some(2)))
        .await
        .unwrap();
    let q1 = store
        .question_service
        .create_question(question_payload(exam.id, "first", Some(1)))
        .await
        .unwrap();

    let t0 = Utc::now() - Duration::minutes(10);
    let submission = store
        .submission_service
        .create_submission(CreateSubmissionPayload {
            student_id: student,
            exam_id: exam.id,
            start_time: t0,
            submit_time: t0 + Duration::minutes(5),
            grade: None,
            grading_status: None,
            grading_feedback: None,
            time_taken: None,
            ip_address: None,
            user_agent: None,
            attempt_number: 1,
        })
        .await
        .unwrap();

    // Answered out of order; listing follows the questions' order.
    for question_id in [q2.id, q1.id] {
        store
            .answer_service
            .create_answer(exam_schema_backend::dto::answer_dto::CreateAnswerPayload {
                submission_id: submission.id,
                question_id,
                student_answer: serde_json::json!("answer"),
                marks_awarded: None,
                feedback: None,
            })
            .await
            .unwrap();
    }

    let answers = store
        .answer_service
        .list_answers_for_submission(submission.id)
        .await
        .unwrap();
    assert_eq!(answers.len(), 2);
    assert_eq!(answers[0].question_id, q1.id);
    assert_eq!(answers[1].question_id, q2.id);

    store.exam_service.delete_exam(exam.id).await.unwrap();
}

#[tokio::test]
async fn partial_update_keeps_unset_fields() {
    let store = setup_store().await;
    let exam = store
        .exam_service
        .create_exam(exam_payload("Patch me", "CS104"))
        .await
        .unwrap();

    let updated = store
        .exam_service
        .update_exam(
            exam.id,
            serde_json::from_value::<UpdateExamPayload>(serde_json::json!({
                "title": "Patched",
                "status": "archived",
            }))
            .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(updated.title, "Patched");
    assert_eq!(updated.status, ExamStatus::Archived);
    assert_eq!(updated.course, exam.course);
    assert_eq!(updated.duration_minutes, exam.duration_minutes);
    assert!(updated.updated_at >= exam.updated_at);

    store.exam_service.delete_exam(exam.id).await.unwrap();
}
