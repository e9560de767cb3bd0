use std::sync::Arc;

use tempfile::TempDir;

use super::*;
use crate::ai::testing::{ScriptedChat, StaticFetcher};
use crate::blob::LocalBlobStore;
use crate::models::assignments::{entities::Assignment, requests::CreateAssignmentRequest};
use crate::storage::sea_orm_storage::SeaOrmStorage;

const BASE_URL: &str = "http://localhost:8080/storage";

const GOOD_REPLY: &str = r#"{"score": 62, "percentage": 88.57,
    "strengths": ["Clear structure"], "improvements": ["More citations"],
    "detailed_feedback": "Solid essay.", "recommendations": ["Read chapter 4"],
    "overall_comments": "Well done"}"#;

struct Fixture {
    pipeline: EvaluationPipeline,
    storage: Arc<SeaOrmStorage>,
    blobs: Arc<LocalBlobStore>,
    chat: Arc<ScriptedChat>,
    _dir: TempDir,
}

async fn fixture(replies: Vec<Result<String>>) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(SeaOrmStorage::in_memory().await.unwrap());
    let blobs = Arc::new(LocalBlobStore::new(dir.path(), BASE_URL).unwrap());
    let chat = Arc::new(ScriptedChat::with_replies(replies));
    let fetcher = Arc::new(StaticFetcher(Ok(
        "Photosynthesis converts light energy into chemical energy.".to_string(),
    )));

    let pipeline = EvaluationPipeline::new(storage.clone(), blobs.clone(), chat.clone(), fetcher);
    Fixture {
        pipeline,
        storage,
        blobs,
        chat,
        _dir: dir,
    }
}

async fn assignment(storage: &SeaOrmStorage, max_score: i32) -> Assignment {
    storage
        .create_assignment(CreateAssignmentRequest {
            title: "Photosynthesis essay".to_string(),
            description: Some("Explain photosynthesis".to_string()),
            max_score: Some(max_score),
            total_marks: None,
            template_id: None,
            created_by: Some("faculty-1".to_string()),
        })
        .await
        .unwrap()
}

fn submit_request(assignment_id: &str, file_name: &str, content_type: &str) -> SubmitRequest {
    SubmitRequest {
        assignment_id: assignment_id.to_string(),
        student_id: Some("student-1".to_string()),
        student_name: "Ana".to_string(),
        upload: SubmissionUpload {
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
            bytes: b"essay body".to_vec(),
        },
    }
}

async fn submitted_text(f: &Fixture, max_score: i32) -> Submission {
    let a = assignment(&f.storage, max_score).await;
    f.pipeline
        .submit(submit_request(&a.id, "essay.txt", "text/plain"))
        .await
        .unwrap()
}

async fn status_of(f: &Fixture, submission_id: &str) -> SubmissionStatus {
    f.storage
        .get_submission_by_id(submission_id)
        .await
        .unwrap()
        .unwrap()
        .status
}

/// 写入总是失败的对象存储
struct BrokenBlobStore;

#[async_trait::async_trait]
impl BlobStore for BrokenBlobStore {
    async fn put_new(&self, bucket: &str, path: &str, _bytes: &[u8]) -> Result<bool> {
        Err(EvalHubError::blob_storage(format!("disk full: {bucket}/{path}")))
    }

    async fn get(&self, _bucket: &str, _path: &str) -> Result<Option<Vec<u8>>> {
        Ok(None)
    }

    async fn delete(&self, _bucket: &str, _path: &str) -> Result<bool> {
        Ok(false)
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("{BASE_URL}/{bucket}/{path}")
    }
}

#[tokio::test]
async fn submit_uploads_file_then_creates_submission() {
    let f = fixture(vec![]).await;
    let a = assignment(&f.storage, 100).await;

    let submission = f
        .pipeline
        .submit(submit_request(&a.id, "essay.pdf", "application/pdf"))
        .await
        .unwrap();

    assert_eq!(submission.status, SubmissionStatus::Submitted);
    assert_eq!(submission.file_name.as_deref(), Some("essay.pdf"));
    assert_eq!(submission.file_type.as_deref(), Some("application/pdf"));
    assert!(submission.current_evaluation_id.is_none());

    let url = submission.file_path.unwrap();
    let prefix = format!("{BASE_URL}/assignment-files/");
    assert!(url.starts_with(&prefix));
    assert!(url.ends_with(".pdf"));
    let path = &url[prefix.len()..];
    assert!(path.starts_with("assignments/"));
    assert_eq!(
        f.blobs.get("assignment-files", path).await.unwrap(),
        Some(b"essay body".to_vec())
    );
}

#[tokio::test]
async fn failed_upload_creates_no_submission() {
    let f = fixture(vec![]).await;
    let a = assignment(&f.storage, 100).await;
    let pipeline = EvaluationPipeline::new(
        f.storage.clone(),
        Arc::new(BrokenBlobStore),
        f.chat.clone(),
        Arc::new(StaticFetcher(Ok(String::new()))),
    );

    let err = pipeline
        .submit(submit_request(&a.id, "essay.txt", "text/plain"))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E014");

    let list = f
        .storage
        .list_submissions(Default::default())
        .await
        .unwrap();
    assert!(list.items.is_empty());
}

#[tokio::test]
async fn submit_rejects_unknown_assignment_and_blank_name() {
    let f = fixture(vec![]).await;
    let err = f
        .pipeline
        .submit(submit_request("missing", "essay.txt", "text/plain"))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E008");

    let a = assignment(&f.storage, 100).await;
    let mut req = submit_request(&a.id, "essay.txt", "text/plain");
    req.student_name = "  ".to_string();
    assert_eq!(f.pipeline.submit(req).await.unwrap_err().code(), "E007");
}

#[tokio::test]
async fn ai_evaluation_persists_score_and_grades() {
    let f = fixture(vec![Ok(GOOD_REPLY.to_string())]).await;
    let submission = submitted_text(&f, 70).await;

    let result = f
        .pipeline
        .evaluate_with_ai(&submission.id, None)
        .await
        .unwrap();

    assert!(!result.outcome.is_fallback());
    let evaluation = &result.evaluation;
    assert_eq!(evaluation.score, 62);
    assert_eq!(evaluation.max_score, 70);
    assert_eq!(evaluation.evaluation_type, EvaluationType::Ai);
    assert!(!evaluation.is_published);
    let feedback = evaluation.ai_feedback.as_ref().unwrap();
    assert_eq!(feedback.strengths, vec!["Clear structure".to_string()]);
    assert!(!feedback.is_fallback);

    let reloaded = f
        .storage
        .get_submission_by_id(&submission.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.status, SubmissionStatus::Graded);
    assert_eq!(reloaded.current_evaluation_id, Some(evaluation.id.clone()));
}

#[tokio::test]
async fn unparseable_model_output_is_tagged_fallback() {
    let f = fixture(vec![Ok("This essay is quite good overall.".to_string())]).await;
    let submission = submitted_text(&f, 70).await;

    let result = f
        .pipeline
        .evaluate_with_ai(&submission.id, Some("Essay".to_string()))
        .await
        .unwrap();

    assert!(result.outcome.is_fallback());
    assert_eq!(result.evaluation.score, 49);
    let stored = f
        .storage
        .get_evaluation_by_id(&result.evaluation.id)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.ai_feedback.unwrap().is_fallback);
    assert_eq!(status_of(&f, &submission.id).await, SubmissionStatus::Graded);
}

#[tokio::test]
async fn ai_score_is_clamped_to_max() {
    let f = fixture(vec![Ok(
        r#"{"score": 95, "percentage": 135}"#.to_string()
    )])
    .await;
    let submission = submitted_text(&f, 70).await;

    let result = f
        .pipeline
        .evaluate_with_ai(&submission.id, None)
        .await
        .unwrap();
    assert_eq!(result.evaluation.score, 70);
    assert_eq!(result.outcome.data().score, 70.0);
    assert_eq!(result.outcome.data().percentage, 100.0);
    let stored = result.evaluation.ai_feedback.unwrap();
    assert_eq!(stored.percentage, 100.0);
}

#[tokio::test]
async fn model_reply_without_percentage_keeps_its_score() {
    let f = fixture(vec![Ok(r#"{"score": 62, "strengths": ["x"]}"#.to_string())]).await;
    let submission = submitted_text(&f, 70).await;

    let result = f
        .pipeline
        .evaluate_with_ai(&submission.id, None)
        .await
        .unwrap();
    assert!(!result.outcome.is_fallback());
    assert_eq!(result.evaluation.score, 62);
    assert_eq!(result.outcome.data().percentage, 88.6);
}

#[tokio::test]
async fn word_document_fails_extraction_without_scoring() {
    let f = fixture(vec![Ok(GOOD_REPLY.to_string())]).await;
    let a = assignment(&f.storage, 100).await;
    let submission = f
        .pipeline
        .submit(submit_request(&a.id, "essay.doc", "application/msword"))
        .await
        .unwrap();

    let err = f
        .pipeline
        .evaluate_with_ai(&submission.id, None)
        .await
        .unwrap_err();

    assert_eq!(err.code(), "E017");
    assert_eq!(f.chat.call_count(), 0);
    assert_eq!(
        status_of(&f, &submission.id).await,
        SubmissionStatus::EvaluationFailed
    );
    let evaluations = f
        .storage
        .list_evaluations(Default::default())
        .await
        .unwrap();
    assert!(evaluations.items.is_empty());
}

#[tokio::test]
async fn failed_evaluation_can_be_retried() {
    let f = fixture(vec![
        Err(EvalHubError::upstream("OpenAI API error: 503")),
        Ok(GOOD_REPLY.to_string()),
    ])
    .await;
    let submission = submitted_text(&f, 70).await;

    let err = f
        .pipeline
        .evaluate_with_ai(&submission.id, None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E015");
    assert_eq!(
        status_of(&f, &submission.id).await,
        SubmissionStatus::EvaluationFailed
    );

    f.pipeline
        .evaluate_with_ai(&submission.id, None)
        .await
        .unwrap();
    assert_eq!(status_of(&f, &submission.id).await, SubmissionStatus::Graded);
}

#[tokio::test]
async fn evaluation_rejected_while_in_progress_or_graded() {
    let f = fixture(vec![Ok(GOOD_REPLY.to_string())]).await;
    let submission = submitted_text(&f, 70).await;

    f.storage
        .transition_submission_status(
            &submission.id,
            &[SubmissionStatus::Submitted],
            SubmissionStatus::Evaluating,
        )
        .await
        .unwrap();
    let err = f
        .pipeline
        .evaluate_with_ai(&submission.id, None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E019");
    // 被拒绝的调用不影响进行中的评测
    assert_eq!(status_of(&f, &submission.id).await, SubmissionStatus::Evaluating);
    assert_eq!(f.chat.call_count(), 0);

    let other = submitted_text(&f, 70).await;
    f.pipeline.evaluate_with_ai(&other.id, None).await.unwrap();
    let err = f
        .pipeline
        .evaluate_with_ai(&other.id, None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E020");
}

#[tokio::test]
async fn concurrent_evaluations_produce_one_result() {
    let f = fixture(vec![Ok(GOOD_REPLY.to_string()), Ok(GOOD_REPLY.to_string())]).await;
    let submission = submitted_text(&f, 70).await;

    let (first, second) = tokio::join!(
        f.pipeline.evaluate_with_ai(&submission.id, None),
        f.pipeline.evaluate_with_ai(&submission.id, None)
    );

    assert_eq!(first.is_ok() as u8 + second.is_ok() as u8, 1);
    let evaluations = f
        .storage
        .list_evaluations(Default::default())
        .await
        .unwrap();
    assert_eq!(evaluations.items.len(), 1);
    assert_eq!(status_of(&f, &submission.id).await, SubmissionStatus::Graded);
}

#[tokio::test]
async fn manual_score_out_of_range_is_rejected() {
    let f = fixture(vec![]).await;
    let submission = submitted_text(&f, 70).await;

    let manual = |score: i32, max_score: Option<i32>| CreateManualEvaluationRequest {
        submission_id: submission.id.clone(),
        score,
        max_score,
        remarks: Some("see comments".to_string()),
        evaluator_id: Some("faculty-1".to_string()),
    };

    let err = f
        .pipeline
        .create_manual_evaluation(manual(80, Some(70)))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E018");

    // 未提供满分时取作业满分
    let err = f
        .pipeline
        .create_manual_evaluation(manual(71, None))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E018");

    let err = f
        .pipeline
        .create_manual_evaluation(manual(-1, Some(70)))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E018");

    let err = f
        .pipeline
        .create_manual_evaluation(manual(0, Some(0)))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E007");

    // 不能通过抬高满分绕过分数范围
    let err = f
        .pipeline
        .create_manual_evaluation(manual(900, Some(1000)))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E007");

    assert!(
        f.storage
            .list_evaluations(Default::default())
            .await
            .unwrap()
            .items
            .is_empty()
    );

    let evaluation = f
        .pipeline
        .create_manual_evaluation(manual(70, None))
        .await
        .unwrap();
    assert_eq!(evaluation.max_score, 70);
    assert_eq!(evaluation.evaluation_type, EvaluationType::Manual);
    assert_eq!(
        status_of(&f, &submission.id).await,
        SubmissionStatus::Submitted
    );
}

#[tokio::test]
async fn publish_is_idempotent() {
    let f = fixture(vec![Ok(GOOD_REPLY.to_string())]).await;
    let submission = submitted_text(&f, 70).await;
    let result = f
        .pipeline
        .evaluate_with_ai(&submission.id, None)
        .await
        .unwrap();

    let first = f
        .pipeline
        .publish_evaluation(&result.evaluation.id)
        .await
        .unwrap();
    let second = f
        .pipeline
        .publish_evaluation(&result.evaluation.id)
        .await
        .unwrap();
    assert!(first.is_published);
    assert!(second.is_published);

    let err = f.pipeline.publish_evaluation("missing").await.unwrap_err();
    assert_eq!(err.code(), "E008");
}

#[tokio::test]
async fn mark_graded_requires_an_evaluation() {
    let f = fixture(vec![]).await;
    let submission = submitted_text(&f, 70).await;

    let err = f.pipeline.mark_graded(&submission.id).await.unwrap_err();
    assert_eq!(err.code(), "E020");
    assert_eq!(
        status_of(&f, &submission.id).await,
        SubmissionStatus::Submitted
    );

    f.pipeline
        .create_manual_evaluation(CreateManualEvaluationRequest {
            submission_id: submission.id.clone(),
            score: 50,
            max_score: None,
            remarks: None,
            evaluator_id: None,
        })
        .await
        .unwrap();
    let graded = f.pipeline.mark_graded(&submission.id).await.unwrap();
    assert_eq!(graded.status, SubmissionStatus::Graded);

    let err = f.pipeline.mark_graded(&submission.id).await.unwrap_err();
    assert_eq!(err.code(), "E020");
}

#[tokio::test]
async fn current_evaluation_depends_on_view() {
    let f = fixture(vec![]).await;
    let submission = submitted_text(&f, 70).await;

    let manual = |score: i32| CreateManualEvaluationRequest {
        submission_id: submission.id.clone(),
        score,
        max_score: None,
        remarks: None,
        evaluator_id: None,
    };

    assert!(
        f.pipeline
            .resolve_current_evaluation(&submission.id, EvaluationView::Faculty)
            .await
            .unwrap()
            .is_none()
    );

    let older = f.pipeline.create_manual_evaluation(manual(40)).await.unwrap();
    f.pipeline.publish_evaluation(&older.id).await.unwrap();
    let newer = f.pipeline.create_manual_evaluation(manual(55)).await.unwrap();

    let faculty = f
        .pipeline
        .resolve_current_evaluation(&submission.id, EvaluationView::Faculty)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(faculty.id, newer.id);

    let student = f
        .pipeline
        .resolve_current_evaluation(&submission.id, EvaluationView::Student)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(student.id, older.id);

    let err = f
        .pipeline
        .resolve_current_evaluation("missing", EvaluationView::Student)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E008");
}
