//! 评测流水线
//!
//! 串联存储、对象存储与 AI 服务，负责提交、AI 评测、人工评分、发布以及
//! 当前评测的判定。提交状态只能沿 submitted → evaluating → graded 前进，
//! AI 评测失败时回到 evaluation_failed 以便重试。

mod resolve;

#[cfg(test)]
mod tests;

pub use resolve::resolve_current;

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::ai::{
    AiOutcome, ChatCompletion, TextFetcher, extract,
    scoring::{self, ScoringInput},
};
use crate::blob::{self, BlobStore, SUBMISSION_BUCKET};
use crate::errors::{EvalHubError, Result};
use crate::models::{
    assignments::entities::DEFAULT_MAX_SCORE,
    evaluations::{
        entities::{AiFeedback, Evaluation, EvaluationType, NewEvaluation},
        requests::{CreateManualEvaluationRequest, EvaluationListQuery, EvaluationView},
    },
    submissions::{
        entities::{Submission, SubmissionStatus},
        requests::{NewSubmission, SubmissionUpload},
    },
};
use crate::storage::Storage;

/// 提交参数
#[derive(Debug, Clone)]
pub struct SubmitRequest {
    pub assignment_id: String,
    pub student_id: Option<String>,
    pub student_name: String,
    pub upload: SubmissionUpload,
}

/// AI 评测结果
#[derive(Debug, Clone)]
pub struct AiEvaluationResult {
    pub evaluation: Evaluation,
    pub outcome: AiOutcome<AiFeedback>,
}

#[derive(Clone)]
pub struct EvaluationPipeline {
    storage: Arc<dyn Storage>,
    blobs: Arc<dyn BlobStore>,
    chat: Arc<dyn ChatCompletion>,
    fetcher: Arc<dyn TextFetcher>,
}

impl EvaluationPipeline {
    pub fn new(
        storage: Arc<dyn Storage>,
        blobs: Arc<dyn BlobStore>,
        chat: Arc<dyn ChatCompletion>,
        fetcher: Arc<dyn TextFetcher>,
    ) -> Self {
        Self {
            storage,
            blobs,
            chat,
            fetcher,
        }
    }

    pub fn chat(&self) -> &dyn ChatCompletion {
        self.chat.as_ref()
    }

    pub fn fetcher(&self) -> &dyn TextFetcher {
        self.fetcher.as_ref()
    }

    /// 提交作业：先上传文件，再写入提交记录
    pub async fn submit(&self, req: SubmitRequest) -> Result<Submission> {
        if req.student_name.trim().is_empty() {
            return Err(EvalHubError::validation("Student name is required"));
        }
        if req.upload.bytes.is_empty() {
            return Err(EvalHubError::validation("Uploaded file is empty"));
        }
        if self
            .storage
            .get_assignment_by_id(&req.assignment_id)
            .await?
            .is_none()
        {
            return Err(EvalHubError::not_found(format!(
                "Assignment not found: {}",
                req.assignment_id
            )));
        }

        // 上传失败时不产生提交记录
        let ext = blob::file_extension(&req.upload.file_name);
        let stem = chrono::Utc::now().timestamp_millis().to_string();
        let path = blob::upload_unique(
            self.blobs.as_ref(),
            SUBMISSION_BUCKET,
            "assignments",
            &stem,
            &ext,
            &req.upload.bytes,
        )
        .await?;
        let file_url = self.blobs.public_url(SUBMISSION_BUCKET, &path);

        let created = self
            .storage
            .create_submission(NewSubmission {
                assignment_id: req.assignment_id,
                student_id: req
                    .student_id
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
                student_name: req.student_name.trim().to_string(),
                file_path: file_url,
                file_name: req.upload.file_name,
                file_type: req.upload.content_type,
            })
            .await;

        match created {
            Ok(submission) => {
                info!(
                    submission_id = %submission.id,
                    assignment_id = %submission.assignment_id,
                    "submission created"
                );
                Ok(submission)
            }
            Err(e) => {
                // 清理已上传的文件
                if let Err(cleanup) = self.blobs.delete(SUBMISSION_BUCKET, &path).await {
                    warn!("Failed to remove orphaned upload {}: {}", path, cleanup);
                }
                Err(e)
            }
        }
    }

    /// AI 评测
    ///
    /// 提交被原子地置为 evaluating，之后任一步骤失败都会转入 evaluation_failed。
    pub async fn evaluate_with_ai(
        &self,
        submission_id: &str,
        assignment_title: Option<String>,
    ) -> Result<AiEvaluationResult> {
        let submission = self.require_submission(submission_id).await?;
        if !submission.has_file() {
            return Err(EvalHubError::validation(format!(
                "Submission {submission_id} has no file to evaluate"
            )));
        }

        let started = self
            .storage
            .transition_submission_status(
                submission_id,
                SubmissionStatus::evaluable_states(),
                SubmissionStatus::Evaluating,
            )
            .await?;
        if !started {
            return Err(self.rejected_transition(submission_id).await);
        }

        info!(submission_id, "AI evaluation started");

        match self.run_evaluation(&submission, assignment_title).await {
            Ok(result) => {
                info!(
                    submission_id,
                    evaluation_id = %result.evaluation.id,
                    score = result.evaluation.score,
                    is_fallback = result.outcome.is_fallback(),
                    "AI evaluation completed"
                );
                Ok(result)
            }
            Err(e) => {
                error!("AI evaluation failed for submission {}: {}", submission_id, e);
                match self
                    .storage
                    .transition_submission_status(
                        submission_id,
                        &[SubmissionStatus::Evaluating],
                        SubmissionStatus::EvaluationFailed,
                    )
                    .await
                {
                    Ok(true) => {}
                    Ok(false) => warn!(
                        "Submission {} left evaluating before compensation",
                        submission_id
                    ),
                    Err(compensation) => error!(
                        "Failed to mark submission {} as evaluation_failed: {}",
                        submission_id, compensation
                    ),
                }
                Err(e)
            }
        }
    }

    async fn run_evaluation(
        &self,
        submission: &Submission,
        assignment_title: Option<String>,
    ) -> Result<AiEvaluationResult> {
        let assignment = self
            .storage
            .get_assignment_by_id(&submission.assignment_id)
            .await?;
        let max_score = assignment
            .as_ref()
            .map(|a| a.max_score)
            .filter(|m| *m > 0)
            .unwrap_or(DEFAULT_MAX_SCORE);

        let file_url = submission.file_path.as_deref().unwrap_or_default();
        let text = extract::extract_text(
            self.chat.as_ref(),
            self.fetcher.as_ref(),
            file_url,
            submission.file_type.as_deref(),
        )
        .await?;

        let title = assignment_title
            .filter(|t| !t.trim().is_empty())
            .or_else(|| assignment.as_ref().map(|a| a.title.clone()));
        let input = ScoringInput {
            assignment_title: title.as_deref(),
            assignment_description: assignment.as_ref().and_then(|a| a.description.as_deref()),
            max_score,
            student_response: &text,
        };
        let outcome = scoring::score_submission(self.chat.as_ref(), &input).await?;

        // 分数限定在 [0, max_score]
        let outcome = match outcome {
            AiOutcome::Genuine(feedback) => AiOutcome::Genuine(clamp_feedback(feedback, max_score)),
            AiOutcome::Fallback { data, reason } => AiOutcome::Fallback {
                data: clamp_feedback(data, max_score),
                reason,
            },
        };
        let feedback = outcome.data().clone();

        let evaluation = self
            .storage
            .record_ai_evaluation(NewEvaluation {
                submission_id: submission.id.clone(),
                score: feedback.score as i32,
                max_score,
                evaluation_type: EvaluationType::Ai,
                ai_feedback: Some(feedback),
                manual_remarks: None,
                evaluator_id: None,
            })
            .await?;

        Ok(AiEvaluationResult {
            evaluation,
            outcome,
        })
    }

    /// 人工评分，不改变提交状态
    pub async fn create_manual_evaluation(
        &self,
        req: CreateManualEvaluationRequest,
    ) -> Result<Evaluation> {
        let submission = self.require_submission(&req.submission_id).await?;

        // 满分始终取自作业，请求中的满分只做一致性校验
        let max_score = self
            .storage
            .get_assignment_by_id(&submission.assignment_id)
            .await?
            .map(|a| a.max_score)
            .unwrap_or(DEFAULT_MAX_SCORE);
        if let Some(requested) = req.max_score
            && requested != max_score
        {
            return Err(EvalHubError::validation(format!(
                "Max score {requested} does not match assignment max score {max_score}"
            )));
        }
        if req.score < 0 || req.score > max_score {
            return Err(EvalHubError::score_out_of_range(format!(
                "Score {} is outside 0..={max_score}",
                req.score
            )));
        }

        let evaluation = self
            .storage
            .create_manual_evaluation(NewEvaluation {
                submission_id: submission.id,
                score: req.score,
                max_score,
                evaluation_type: EvaluationType::Manual,
                ai_feedback: None,
                manual_remarks: req.remarks.filter(|r| !r.trim().is_empty()),
                evaluator_id: req.evaluator_id,
            })
            .await?;

        info!(
            submission_id = %evaluation.submission_id,
            evaluation_id = %evaluation.id,
            score = evaluation.score,
            "manual evaluation created"
        );
        Ok(evaluation)
    }

    /// 发布评测，可重复调用
    pub async fn publish_evaluation(&self, evaluation_id: &str) -> Result<Evaluation> {
        self.storage
            .publish_evaluation(evaluation_id)
            .await?
            .ok_or_else(|| {
                EvalHubError::not_found(format!("Evaluation not found: {evaluation_id}"))
            })
    }

    /// 人工将提交置为 graded，要求已有评测记录
    pub async fn mark_graded(&self, submission_id: &str) -> Result<Submission> {
        let submission = self.require_submission(submission_id).await?;

        let has_evaluation = submission.current_evaluation_id.is_some()
            || !self
                .storage
                .list_evaluations(EvaluationListQuery {
                    submission_id: Some(submission_id.to_string()),
                    published_only: None,
                })
                .await?
                .items
                .is_empty();
        if !has_evaluation {
            return Err(EvalHubError::invalid_status_transition(format!(
                "Submission {submission_id} has no evaluation and cannot be graded"
            )));
        }

        let moved = self
            .storage
            .transition_submission_status(
                submission_id,
                &[SubmissionStatus::Submitted, SubmissionStatus::EvaluationFailed],
                SubmissionStatus::Graded,
            )
            .await?;
        if !moved {
            return Err(self.rejected_transition(submission_id).await);
        }

        self.require_submission(submission_id).await
    }

    /// 当前评测
    ///
    /// 教师视角优先使用提交上的当前评测指针。
    pub async fn resolve_current_evaluation(
        &self,
        submission_id: &str,
        view: EvaluationView,
    ) -> Result<Option<Evaluation>> {
        let submission = self.require_submission(submission_id).await?;

        if view == EvaluationView::Faculty
            && let Some(ref current_id) = submission.current_evaluation_id
            && let Some(evaluation) = self.storage.get_evaluation_by_id(current_id).await?
        {
            return Ok(Some(evaluation));
        }

        let evaluations = self
            .storage
            .list_evaluations(EvaluationListQuery {
                submission_id: Some(submission_id.to_string()),
                published_only: Some(view == EvaluationView::Student),
            })
            .await?
            .items;

        Ok(resolve_current(&evaluations, submission_id, view).cloned())
    }

    async fn require_submission(&self, submission_id: &str) -> Result<Submission> {
        self.storage
            .get_submission_by_id(submission_id)
            .await?
            .ok_or_else(|| EvalHubError::not_found(format!("Submission not found: {submission_id}")))
    }

    /// 条件更新未命中时给出具体原因
    async fn rejected_transition(&self, submission_id: &str) -> EvalHubError {
        match self.storage.get_submission_by_id(submission_id).await {
            Ok(Some(s)) if s.status == SubmissionStatus::Evaluating => {
                EvalHubError::evaluation_in_progress(format!(
                    "Submission {submission_id} is already being evaluated"
                ))
            }
            Ok(Some(s)) => EvalHubError::invalid_status_transition(format!(
                "Submission {submission_id} cannot leave status {}",
                s.status
            )),
            Ok(None) => EvalHubError::not_found(format!("Submission not found: {submission_id}")),
            Err(e) => e,
        }
    }
}

fn clamp_feedback(mut feedback: AiFeedback, max_score: i32) -> AiFeedback {
    feedback.score = feedback.score.clamp(0.0, f64::from(max_score)).round();
    feedback.percentage = scoring::percentage_of(feedback.score, max_score);
    feedback
}
