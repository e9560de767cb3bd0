use serde::Deserialize;
use ts_rs::TS;

/// 创建作业请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "assignment.ts")]
pub struct CreateAssignmentRequest {
    pub title: String,
    pub description: Option<String>,
    pub max_score: Option<i32>,
    pub total_marks: Option<i32>,
    pub template_id: Option<String>,
    /// 未提供时由服务端生成占位 ID
    pub created_by: Option<String>,
}
