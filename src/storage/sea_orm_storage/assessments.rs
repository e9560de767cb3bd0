//! 测评模板存储操作

use super::SeaOrmStorage;
use crate::entity::assessment_templates::{
    ActiveModel as TemplateActiveModel, Column as TemplateColumn, Entity as AssessmentTemplates,
};
use crate::entity::assignments::ActiveModel as AssignmentActiveModel;
use crate::entity::questions::{
    ActiveModel as QuestionActiveModel, Column as QuestionColumn, Entity as Questions,
};
use crate::errors::{EvalHubError, Result};
use crate::models::assessments::{
    entities::{AssessmentTemplate, GeneratedAssessment},
    requests::PublishAssessmentRequest,
    responses::{PublishAssessmentResponse, TemplateDetailResponse},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

/// 校验待发布的测评，返回总分
pub fn validate_publishable(assessment: &GeneratedAssessment) -> Result<i32> {
    if assessment.title.trim().is_empty() {
        return Err(EvalHubError::validation("Assessment title must not be empty"));
    }
    if assessment.questions.is_empty() {
        return Err(EvalHubError::validation(
            "Assessment must contain at least one question",
        ));
    }
    if let Some(q) = assessment
        .questions
        .iter()
        .find(|q| q.question_text.trim().is_empty() || q.marks <= 0)
    {
        return Err(EvalHubError::validation(format!(
            "Invalid question at position {}",
            q.order_index
        )));
    }

    let total = assessment.computed_total_marks();
    if total <= 0 {
        return Err(EvalHubError::validation(
            "Total marks must be greater than 0",
        ));
    }
    Ok(total)
}

impl SeaOrmStorage {
    /// 发布测评：模板、题目、作业一并写入
    pub async fn publish_assessment_impl(
        &self,
        req: PublishAssessmentRequest,
    ) -> Result<PublishAssessmentResponse> {
        let total_marks = validate_publishable(&req.assessment)?;
        let now = chrono::Utc::now().timestamp_millis();
        let created_by = req.created_by.unwrap_or_else(|| "system".to_string());
        let assessment = req.assessment;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EvalHubError::database_operation(format!("开启事务失败: {e}")))?;

        let template = TemplateActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            title: Set(assessment.title.clone()),
            description: Set(Some(assessment.description.clone())),
            topic: Set(req.topic.unwrap_or_else(|| assessment.title.clone())),
            difficulty_level: Set(req.difficulty_level.unwrap_or_default().to_string()),
            total_questions: Set(assessment.questions.len() as i32),
            is_published: Set(true),
            created_by: Set(created_by.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| EvalHubError::database_operation(format!("创建测评模板失败: {e}")))?;

        // 按原有顺序重新编号
        let mut ordered = assessment.questions;
        ordered.sort_by_key(|q| q.order_index);

        let mut questions = Vec::with_capacity(ordered.len());
        for (index, q) in ordered.into_iter().enumerate() {
            let model = QuestionActiveModel {
                id: Set(uuid::Uuid::new_v4().to_string()),
                assessment_template_id: Set(template.id.clone()),
                question_text: Set(q.question_text),
                question_type: Set(q.question_type.to_string()),
                marks: Set(q.marks),
                order_index: Set(index as i32 + 1),
                created_at: Set(now),
            }
            .insert(&txn)
            .await
            .map_err(|e| EvalHubError::database_operation(format!("创建题目失败: {e}")))?;
            questions.push(model.into_question());
        }

        let assignment = AssignmentActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            title: Set(assessment.title),
            description: Set(Some(assessment.description)),
            max_score: Set(total_marks),
            total_marks: Set(Some(total_marks)),
            template_id: Set(Some(template.id.clone())),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| EvalHubError::database_operation(format!("创建作业失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| EvalHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(PublishAssessmentResponse {
            template: template.into_template(),
            questions,
            assignment: assignment.into_assignment(),
        })
    }

    /// 获取模板及题目
    pub async fn get_template_with_questions_impl(
        &self,
        id: &str,
    ) -> Result<Option<TemplateDetailResponse>> {
        let Some(template) = AssessmentTemplates::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| EvalHubError::database_operation(format!("查询测评模板失败: {e}")))?
        else {
            return Ok(None);
        };

        let questions = Questions::find()
            .filter(QuestionColumn::AssessmentTemplateId.eq(id))
            .order_by_asc(QuestionColumn::OrderIndex)
            .all(&self.db)
            .await
            .map_err(|e| EvalHubError::database_operation(format!("查询题目失败: {e}")))?
            .into_iter()
            .map(|m| m.into_question())
            .collect();

        Ok(Some(TemplateDetailResponse {
            template: template.into_template(),
            questions,
        }))
    }

    /// 列出模板
    pub async fn list_templates_impl(&self) -> Result<Vec<AssessmentTemplate>> {
        let items = AssessmentTemplates::find()
            .order_by_desc(TemplateColumn::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| EvalHubError::database_operation(format!("查询测评模板失败: {e}")))?
            .into_iter()
            .map(|m| m.into_template())
            .collect();

        Ok(items)
    }
}
