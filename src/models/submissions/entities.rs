use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 提交状态
//
// submitted -> evaluating -> graded
// evaluating -> evaluation_failed -> evaluating（重试）
// submitted / evaluation_failed -> graded（人工评分）
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "submission.ts")]
pub enum SubmissionStatus {
    Submitted,        // 已提交
    Evaluating,       // AI 评测中
    Graded,           // 已评分
    EvaluationFailed, // AI 评测失败，可重试
}

impl SubmissionStatus {
    pub const SUBMITTED: &'static str = "submitted";
    pub const EVALUATING: &'static str = "evaluating";
    pub const GRADED: &'static str = "graded";
    pub const EVALUATION_FAILED: &'static str = "evaluation_failed";

    /// 可以开始 AI 评测的状态
    pub fn evaluable_states() -> &'static [SubmissionStatus] {
        &[Self::Submitted, Self::EvaluationFailed]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Submitted => Self::SUBMITTED,
            SubmissionStatus::Evaluating => Self::EVALUATING,
            SubmissionStatus::Graded => Self::GRADED,
            SubmissionStatus::EvaluationFailed => Self::EVALUATION_FAILED,
        }
    }

    /// 状态只能向前流转，graded 为终态
    pub fn can_transition_to(&self, next: SubmissionStatus) -> bool {
        use SubmissionStatus::*;
        matches!(
            (self, next),
            (Submitted, Evaluating)
                | (Submitted, Graded)
                | (Evaluating, Graded)
                | (Evaluating, EvaluationFailed)
                | (EvaluationFailed, Evaluating)
                | (EvaluationFailed, Graded)
        )
    }
}

impl<'de> Deserialize<'de> for SubmissionStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的提交状态: '{s}'. 支持的状态: submitted, evaluating, graded, evaluation_failed"
            ))
        })
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::SUBMITTED => Ok(SubmissionStatus::Submitted),
            Self::EVALUATING => Ok(SubmissionStatus::Evaluating),
            Self::GRADED => Ok(SubmissionStatus::Graded),
            Self::EVALUATION_FAILED => Ok(SubmissionStatus::EvaluationFailed),
            _ => Err(format!("Invalid submission status: {s}")),
        }
    }
}

// 提交实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "submission.ts")]
pub struct Submission {
    pub id: String,
    pub assignment_id: String,
    pub student_id: String,
    pub student_name: String,
    // 文件公开 URL
    pub file_path: Option<String>,
    // 原始文件名
    pub file_name: Option<String>,
    // MIME 类型
    pub file_type: Option<String>,
    pub submission_date: chrono::DateTime<chrono::Utc>,
    pub status: SubmissionStatus,
    // 当前生效的评测记录
    pub current_evaluation_id: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Submission {
    pub fn has_file(&self) -> bool {
        self.file_path.as_deref().is_some_and(|p| !p.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions() {
        use SubmissionStatus::*;
        assert!(Submitted.can_transition_to(Evaluating));
        assert!(Evaluating.can_transition_to(Graded));
        assert!(Evaluating.can_transition_to(EvaluationFailed));
        assert!(EvaluationFailed.can_transition_to(Evaluating));
    }

    #[test]
    fn test_no_regression() {
        use SubmissionStatus::*;
        assert!(!Graded.can_transition_to(Submitted));
        assert!(!Graded.can_transition_to(Evaluating));
        assert!(!Evaluating.can_transition_to(Submitted));
        assert!(!EvaluationFailed.can_transition_to(Submitted));
        assert!(!Evaluating.can_transition_to(Evaluating));
    }

    #[test]
    fn test_status_round_trip_strings() {
        assert_eq!(
            "evaluation_failed".parse::<SubmissionStatus>(),
            Ok(SubmissionStatus::EvaluationFailed)
        );
        assert_eq!(SubmissionStatus::Graded.to_string(), "graded");
        assert!("failed".parse::<SubmissionStatus>().is_err());
    }
}
