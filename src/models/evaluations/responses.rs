use serde::Serialize;
use ts_rs::TS;

use super::entities::{AiFeedback, Evaluation};

/// AI 评测结果
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "evaluation.ts")]
pub struct AiEvaluationResponse {
    pub evaluation_id: String,
    pub evaluation: AiFeedback,
}

/// 评测列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "evaluation.ts")]
pub struct EvaluationListResponse {
    pub items: Vec<Evaluation>,
}
