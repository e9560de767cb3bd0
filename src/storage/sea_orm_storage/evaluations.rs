//! 评测存储操作

use super::SeaOrmStorage;
use crate::entity::evaluations::{ActiveModel, Column, Entity as Evaluations};
use crate::entity::submissions::{Column as SubmissionColumn, Entity as Submissions};
use crate::errors::{EvalHubError, Result};
use crate::models::evaluations::{
    entities::{Evaluation, NewEvaluation},
    requests::EvaluationListQuery,
    responses::EvaluationListResponse,
};
use crate::models::submissions::entities::SubmissionStatus;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 写入人工评测
    pub async fn create_manual_evaluation_impl(&self, req: NewEvaluation) -> Result<Evaluation> {
        let txn = self.begin_txn().await?;
        let submission_id = req.submission_id.clone();
        let evaluation = insert_evaluation(&txn, req).await?;

        let result = Submissions::update_many()
            .col_expr(
                SubmissionColumn::CurrentEvaluationId,
                Expr::value(evaluation.id.clone()),
            )
            .col_expr(
                SubmissionColumn::UpdatedAt,
                Expr::value(evaluation.created_at.timestamp_millis()),
            )
            .filter(SubmissionColumn::Id.eq(submission_id.as_str()))
            .exec(&txn)
            .await
            .map_err(|e| EvalHubError::database_operation(format!("更新当前评测失败: {e}")))?;

        if result.rows_affected == 0 {
            return Err(EvalHubError::not_found(format!(
                "Submission not found: {submission_id}"
            )));
        }

        commit_txn(txn).await?;
        Ok(evaluation)
    }

    /// 写入 AI 评测并完成 evaluating -> graded
    pub async fn record_ai_evaluation_impl(&self, req: NewEvaluation) -> Result<Evaluation> {
        let txn = self.begin_txn().await?;
        let submission_id = req.submission_id.clone();
        let evaluation = insert_evaluation(&txn, req).await?;

        let result = Submissions::update_many()
            .col_expr(
                SubmissionColumn::Status,
                Expr::value(SubmissionStatus::GRADED),
            )
            .col_expr(
                SubmissionColumn::CurrentEvaluationId,
                Expr::value(evaluation.id.clone()),
            )
            .col_expr(
                SubmissionColumn::UpdatedAt,
                Expr::value(evaluation.created_at.timestamp_millis()),
            )
            .filter(SubmissionColumn::Id.eq(submission_id.as_str()))
            .filter(SubmissionColumn::Status.eq(SubmissionStatus::EVALUATING))
            .exec(&txn)
            .await
            .map_err(|e| EvalHubError::database_operation(format!("更新提交状态失败: {e}")))?;

        // 未提交的事务在 drop 时回滚
        if result.rows_affected == 0 {
            return Err(EvalHubError::invalid_status_transition(format!(
                "Submission {submission_id} is no longer evaluating"
            )));
        }

        commit_txn(txn).await?;
        Ok(evaluation)
    }

    /// 通过 ID 获取评测
    pub async fn get_evaluation_by_id_impl(&self, id: &str) -> Result<Option<Evaluation>> {
        let result = Evaluations::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| EvalHubError::database_operation(format!("查询评测失败: {e}")))?;

        Ok(result.map(|m| m.into_evaluation()))
    }

    /// 列出评测，最新在前
    pub async fn list_evaluations_impl(
        &self,
        query: EvaluationListQuery,
    ) -> Result<EvaluationListResponse> {
        let mut select = Evaluations::find();

        if let Some(ref submission_id) = query.submission_id {
            select = select.filter(Column::SubmissionId.eq(submission_id.as_str()));
        }

        if query.published_only.unwrap_or(false) {
            select = select.filter(Column::IsPublished.eq(true));
        }

        let items = select
            .order_by_desc(Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| EvalHubError::database_operation(format!("查询评测列表失败: {e}")))?
            .into_iter()
            .map(|m| m.into_evaluation())
            .collect();

        Ok(EvaluationListResponse { items })
    }

    /// 发布评测
    pub async fn publish_evaluation_impl(&self, id: &str) -> Result<Option<Evaluation>> {
        let now = chrono::Utc::now().timestamp_millis();

        // 已发布的记录不再改动
        Evaluations::update_many()
            .col_expr(Column::IsPublished, Expr::value(true))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::IsPublished.eq(false))
            .exec(&self.db)
            .await
            .map_err(|e| EvalHubError::database_operation(format!("发布评测失败: {e}")))?;

        self.get_evaluation_by_id_impl(id).await
    }

    async fn begin_txn(&self) -> Result<DatabaseTransaction> {
        self.db
            .begin()
            .await
            .map_err(|e| EvalHubError::database_operation(format!("开启事务失败: {e}")))
    }
}

async fn commit_txn(txn: DatabaseTransaction) -> Result<()> {
    txn.commit()
        .await
        .map_err(|e| EvalHubError::database_operation(format!("提交事务失败: {e}")))
}

/// 插入评测记录
///
/// 同一提交下的 created_at 严格递增，保证“最新一条”的顺序稳定。
async fn insert_evaluation<C: ConnectionTrait>(conn: &C, req: NewEvaluation) -> Result<Evaluation> {
    let latest = Evaluations::find()
        .filter(Column::SubmissionId.eq(req.submission_id.as_str()))
        .select_only()
        .column_as(Column::CreatedAt.max(), "max_created_at")
        .into_tuple::<Option<i64>>()
        .one(conn)
        .await
        .map_err(|e| EvalHubError::database_operation(format!("查询最新评测时间失败: {e}")))?
        .flatten();

    let mut now = chrono::Utc::now().timestamp_millis();
    if let Some(latest) = latest
        && now <= latest
    {
        now = latest + 1;
    }

    let ai_feedback = req
        .ai_feedback
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;

    let model = ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        submission_id: Set(req.submission_id),
        score: Set(req.score),
        max_score: Set(req.max_score),
        evaluation_type: Set(req.evaluation_type.to_string()),
        ai_feedback: Set(ai_feedback),
        manual_remarks: Set(req.manual_remarks),
        evaluator_id: Set(req.evaluator_id),
        is_published: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let result = model
        .insert(conn)
        .await
        .map_err(|e| EvalHubError::database_operation(format!("创建评测失败: {e}")))?;

    Ok(result.into_evaluation())
}
