//! 提交存储操作

use super::SeaOrmStorage;
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions};
use crate::errors::{EvalHubError, Result};
use crate::models::submissions::{
    entities::{Submission, SubmissionStatus},
    requests::{NewSubmission, SubmissionListQuery},
    responses::SubmissionListResponse,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建提交
    pub async fn create_submission_impl(&self, req: NewSubmission) -> Result<Submission> {
        let now = chrono::Utc::now().timestamp_millis();

        let model = ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            assignment_id: Set(req.assignment_id),
            student_id: Set(req.student_id),
            student_name: Set(req.student_name),
            file_path: Set(Some(req.file_path)),
            file_name: Set(Some(req.file_name)),
            file_type: Set(Some(req.file_type)),
            submission_date: Set(now),
            status: Set(SubmissionStatus::Submitted.to_string()),
            current_evaluation_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EvalHubError::database_operation(format!("创建提交失败: {e}")))?;

        Ok(result.into_submission())
    }

    /// 通过 ID 获取提交
    pub async fn get_submission_by_id_impl(&self, id: &str) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| EvalHubError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 列出提交
    pub async fn list_submissions_impl(
        &self,
        query: SubmissionListQuery,
    ) -> Result<SubmissionListResponse> {
        let mut select = Submissions::find();

        if let Some(ref assignment_id) = query.assignment_id {
            select = select.filter(Column::AssignmentId.eq(assignment_id.as_str()));
        }

        let items = select
            .order_by_desc(Column::SubmissionDate)
            .all(&self.db)
            .await
            .map_err(|e| EvalHubError::database_operation(format!("查询提交列表失败: {e}")))?
            .into_iter()
            .map(|m| m.into_submission())
            .collect();

        Ok(SubmissionListResponse { items })
    }

    /// 条件状态流转
    ///
    /// 单条 UPDATE ... WHERE status IN (...)，并发时只有一个调用方能成功。
    pub async fn transition_submission_status_impl(
        &self,
        id: &str,
        from: &[SubmissionStatus],
        to: SubmissionStatus,
    ) -> Result<bool> {
        let now = chrono::Utc::now().timestamp_millis();
        let from: Vec<&'static str> = from.iter().map(|s| s.as_str()).collect();

        let result = Submissions::update_many()
            .col_expr(Column::Status, sea_orm::sea_query::Expr::value(to.as_str()))
            .col_expr(Column::UpdatedAt, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::Status.is_in(from))
            .exec(&self.db)
            .await
            .map_err(|e| EvalHubError::database_operation(format!("更新提交状态失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
