use serde::Deserialize;
use ts_rs::TS;

use super::entities::{DifficultyLevel, GeneratedAssessment};

/// 生成测评请求
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "assessment.ts")]
pub struct GenerateAssessmentRequest {
    pub topic: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub total_questions: i32,
    pub difficulty_level: Option<DifficultyLevel>,
}

/// 发布测评请求：保存为模板并生成作业
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "assessment.ts")]
pub struct PublishAssessmentRequest {
    pub assessment: GeneratedAssessment,
    /// 未提供时使用测评标题
    pub topic: Option<String>,
    pub difficulty_level: Option<DifficultyLevel>,
    pub created_by: Option<String>,
}
