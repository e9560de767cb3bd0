use serde::Serialize;
use ts_rs::TS;

use super::entities::{AssessmentTemplate, GeneratedAssessment, Question};
use crate::models::assignments::entities::Assignment;

/// 生成测评响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "assessment.ts")]
pub struct GenerateAssessmentResponse {
    pub success: bool,
    pub assessment: GeneratedAssessment,
}

/// 模板详情（含有序题目）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "assessment.ts")]
pub struct TemplateDetailResponse {
    pub template: AssessmentTemplate,
    pub questions: Vec<Question>,
}

/// 发布测评响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "assessment.ts")]
pub struct PublishAssessmentResponse {
    pub template: AssessmentTemplate,
    pub questions: Vec<Question>,
    pub assignment: Assignment,
}
