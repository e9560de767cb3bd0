use std::sync::Arc;

use crate::models::{
    assessments::{
        entities::AssessmentTemplate,
        requests::PublishAssessmentRequest,
        responses::{PublishAssessmentResponse, TemplateDetailResponse},
    },
    assignments::{
        entities::Assignment,
        requests::CreateAssignmentRequest,
        responses::{AssignmentListResponse, AssignmentStatsResponse},
    },
    evaluations::{
        entities::{Evaluation, NewEvaluation},
        requests::EvaluationListQuery,
        responses::EvaluationListResponse,
    },
    submissions::{
        entities::{Submission, SubmissionStatus},
        requests::{NewSubmission, SubmissionListQuery},
        responses::SubmissionListResponse,
    },
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 作业管理方法
    // 创建作业
    async fn create_assignment(&self, req: CreateAssignmentRequest) -> Result<Assignment>;
    // 通过ID获取作业
    async fn get_assignment_by_id(&self, id: &str) -> Result<Option<Assignment>>;
    // 列出作业（按创建时间倒序）
    async fn list_assignments(&self) -> Result<AssignmentListResponse>;
    // 作业提交统计
    async fn get_assignment_stats(&self, id: &str) -> Result<AssignmentStatsResponse>;

    /// 提交管理方法
    // 创建提交，状态为 submitted
    async fn create_submission(&self, submission: NewSubmission) -> Result<Submission>;
    // 通过ID获取提交
    async fn get_submission_by_id(&self, id: &str) -> Result<Option<Submission>>;
    // 列出提交（按提交时间倒序）
    async fn list_submissions(&self, query: SubmissionListQuery) -> Result<SubmissionListResponse>;
    // 条件状态流转：仅当当前状态属于 from 时更新，返回是否更新成功
    async fn transition_submission_status(
        &self,
        id: &str,
        from: &[SubmissionStatus],
        to: SubmissionStatus,
    ) -> Result<bool>;

    /// 评测管理方法
    // 写入人工评测并更新当前评测指针，不改变提交状态
    async fn create_manual_evaluation(&self, evaluation: NewEvaluation) -> Result<Evaluation>;
    // 同一事务内写入 AI 评测、将提交置为 graded 并更新当前评测指针
    async fn record_ai_evaluation(&self, evaluation: NewEvaluation) -> Result<Evaluation>;
    // 通过ID获取评测
    async fn get_evaluation_by_id(&self, id: &str) -> Result<Option<Evaluation>>;
    // 列出评测（按创建时间倒序）
    async fn list_evaluations(&self, query: EvaluationListQuery) -> Result<EvaluationListResponse>;
    // 发布评测，重复发布无副作用
    async fn publish_evaluation(&self, id: &str) -> Result<Option<Evaluation>>;

    /// 测评模板方法
    // 同一事务内保存模板、题目并生成作业
    async fn publish_assessment(
        &self,
        req: PublishAssessmentRequest,
    ) -> Result<PublishAssessmentResponse>;
    // 获取模板及有序题目
    async fn get_template_with_questions(&self, id: &str)
    -> Result<Option<TemplateDetailResponse>>;
    // 列出模板
    async fn list_templates(&self) -> Result<Vec<AssessmentTemplate>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
