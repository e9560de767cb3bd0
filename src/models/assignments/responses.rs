use serde::Serialize;
use ts_rs::TS;

use super::entities::Assignment;

/// 作业列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "assignment.ts")]
pub struct AssignmentListResponse {
    pub items: Vec<Assignment>,
}

/// 作业提交统计
#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[ts(export, export_to = "assignment.ts")]
pub struct AssignmentStatsResponse {
    pub assignment_id: String,
    pub total_submissions: i64,
    pub graded: i64,
    pub ungraded: i64,
}
