use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "assignment.ts")]
pub struct Assignment {
    // 唯一 ID
    pub id: String,
    // 作业标题
    pub title: String,
    // 作业描述
    pub description: Option<String>,
    // 作业满分，必须大于 0
    pub max_score: i32,
    // 由测评模板发布时的总分
    pub total_marks: Option<i32>,
    // 关联的测评模板 ID
    pub template_id: Option<String>,
    // 创建者 ID
    pub created_by: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 未指定满分时的默认值
pub const DEFAULT_MAX_SCORE: i32 = 100;
