use serde::Deserialize;
use ts_rs::TS;

/// 人工评分请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "evaluation.ts")]
pub struct CreateManualEvaluationRequest {
    pub submission_id: String,
    pub score: i32,
    /// 可选，提供时必须与作业满分一致
    pub max_score: Option<i32>,
    pub remarks: Option<String>,
    pub evaluator_id: Option<String>,
}

/// AI 评测请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "evaluation.ts")]
pub struct EvaluateSubmissionRequest {
    pub assignment_title: Option<String>,
}

/// 评测列表查询参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "evaluation.ts")]
pub struct EvaluationListQuery {
    pub submission_id: Option<String>,
    /// 仅返回已发布的评测（学生视角）
    pub published_only: Option<bool>,
}

/// 当前评测的查看视角
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "evaluation.ts")]
pub enum EvaluationView {
    /// 教师批改面板：最新一条，不论是否发布
    #[default]
    Faculty,
    /// 学生视角：仅已发布
    Student,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "evaluation.ts")]
pub struct CurrentEvaluationQuery {
    #[serde(default)]
    pub view: EvaluationView,
}
