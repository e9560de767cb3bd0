//! 作业存储操作

use super::SeaOrmStorage;
use crate::entity::assignments::{ActiveModel, Column, Entity as Assignments};
use crate::entity::submissions::{Column as SubmissionColumn, Entity as Submissions};
use crate::errors::{EvalHubError, Result};
use crate::models::assignments::{
    entities::{Assignment, DEFAULT_MAX_SCORE},
    requests::CreateAssignmentRequest,
    responses::{AssignmentListResponse, AssignmentStatsResponse},
};
use crate::models::submissions::entities::SubmissionStatus;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建作业
    pub async fn create_assignment_impl(&self, req: CreateAssignmentRequest) -> Result<Assignment> {
        let now = chrono::Utc::now().timestamp_millis();

        let model = ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            title: Set(req.title),
            description: Set(req.description),
            max_score: Set(req.max_score.unwrap_or(DEFAULT_MAX_SCORE)),
            total_marks: Set(req.total_marks),
            template_id: Set(req.template_id),
            created_by: Set(req.created_by.unwrap_or_else(|| "system".to_string())),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EvalHubError::database_operation(format!("创建作业失败: {e}")))?;

        Ok(result.into_assignment())
    }

    /// 通过 ID 获取作业
    pub async fn get_assignment_by_id_impl(&self, id: &str) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| EvalHubError::database_operation(format!("查询作业失败: {e}")))?;

        Ok(result.map(|m| m.into_assignment()))
    }

    /// 列出作业
    pub async fn list_assignments_impl(&self) -> Result<AssignmentListResponse> {
        let items = Assignments::find()
            .order_by_desc(Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| EvalHubError::database_operation(format!("查询作业列表失败: {e}")))?
            .into_iter()
            .map(|m| m.into_assignment())
            .collect();

        Ok(AssignmentListResponse { items })
    }

    /// 作业提交统计
    pub async fn get_assignment_stats_impl(&self, id: &str) -> Result<AssignmentStatsResponse> {
        let total = Submissions::find()
            .filter(SubmissionColumn::AssignmentId.eq(id))
            .count(&self.db)
            .await
            .map_err(|e| EvalHubError::database_operation(format!("统计提交数失败: {e}")))?
            as i64;

        let graded = Submissions::find()
            .filter(SubmissionColumn::AssignmentId.eq(id))
            .filter(SubmissionColumn::Status.eq(SubmissionStatus::GRADED))
            .count(&self.db)
            .await
            .map_err(|e| EvalHubError::database_operation(format!("统计已评分提交失败: {e}")))?
            as i64;

        Ok(AssignmentStatsResponse {
            assignment_id: id.to_string(),
            total_submissions: total,
            graded,
            ungraded: total - graded,
        })
    }
}
