use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 评测类型
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "evaluation.ts")]
pub enum EvaluationType {
    Ai,     // AI 评测
    Manual, // 人工评分
}

impl<'de> Deserialize<'de> for EvaluationType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!("无效的评测类型: '{s}'. 支持的类型: ai, manual"))
        })
    }
}

impl std::fmt::Display for EvaluationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvaluationType::Ai => write!(f, "ai"),
            EvaluationType::Manual => write!(f, "manual"),
        }
    }
}

impl std::str::FromStr for EvaluationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ai" => Ok(EvaluationType::Ai),
            "manual" => Ok(EvaluationType::Manual),
            _ => Err(format!("Invalid evaluation type: {s}")),
        }
    }
}

/// AI 结构化反馈，即评分服务的完整输出
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "evaluation.ts")]
pub struct AiFeedback {
    pub score: f64,
    #[serde(default)]
    pub percentage: f64,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
    #[serde(default)]
    pub detailed_feedback: String,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub overall_comments: String,
    /// 模型输出无法解析时生成的兜底结果
    #[serde(default)]
    pub is_fallback: bool,
}

// 评测实体
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "evaluation.ts")]
pub struct Evaluation {
    pub id: String,
    pub submission_id: String,
    pub score: i32,
    pub max_score: i32,
    pub evaluation_type: EvaluationType,
    pub ai_feedback: Option<AiFeedback>,
    pub manual_remarks: Option<String>,
    pub evaluator_id: Option<String>,
    pub is_published: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 存储层创建评测的参数
#[derive(Debug, Clone)]
pub struct NewEvaluation {
    pub submission_id: String,
    pub score: i32,
    pub max_score: i32,
    pub evaluation_type: EvaluationType,
    pub ai_feedback: Option<AiFeedback>,
    pub manual_remarks: Option<String>,
    pub evaluator_id: Option<String>,
}
