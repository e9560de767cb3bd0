use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 难度
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "assessment.ts")]
pub enum DifficultyLevel {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl<'de> Deserialize<'de> for DifficultyLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!("无效的难度: '{s}'. 支持: easy, medium, hard"))
        })
    }
}

impl std::fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DifficultyLevel::Easy => write!(f, "easy"),
            DifficultyLevel::Medium => write!(f, "medium"),
            DifficultyLevel::Hard => write!(f, "hard"),
        }
    }
}

impl std::str::FromStr for DifficultyLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(DifficultyLevel::Easy),
            "medium" => Ok(DifficultyLevel::Medium),
            "hard" => Ok(DifficultyLevel::Hard),
            _ => Err(format!("Invalid difficulty level: {s}")),
        }
    }
}

// 题型
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "assessment.ts")]
pub enum QuestionType {
    Essay,
    ShortAnswer,
    MultipleChoice,
}

impl<'de> Deserialize<'de> for QuestionType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的题型: '{s}'. 支持: essay, short_answer, multiple_choice"
            ))
        })
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuestionType::Essay => write!(f, "essay"),
            QuestionType::ShortAnswer => write!(f, "short_answer"),
            QuestionType::MultipleChoice => write!(f, "multiple_choice"),
        }
    }
}

impl std::str::FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "essay" => Ok(QuestionType::Essay),
            "short_answer" => Ok(QuestionType::ShortAnswer),
            "multiple_choice" => Ok(QuestionType::MultipleChoice),
            _ => Err(format!("Invalid question type: {s}")),
        }
    }
}

/// 测评模板
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "assessment.ts")]
pub struct AssessmentTemplate {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub topic: String,
    pub difficulty_level: DifficultyLevel,
    pub total_questions: i32,
    pub is_published: bool,
    pub created_by: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 模板下的题目
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "assessment.ts")]
pub struct Question {
    pub id: String,
    pub assessment_template_id: String,
    pub question_text: String,
    pub question_type: QuestionType,
    pub marks: i32,
    pub order_index: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 生成（或教师编辑后）的题目
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "assessment.ts")]
pub struct GeneratedQuestion {
    pub question_text: String,
    pub question_type: QuestionType,
    pub marks: i32,
    pub order_index: i32,
    pub sample_answer: Option<String>,
    pub difficulty: Option<DifficultyLevel>,
}

/// 生成（或教师编辑后）的测评
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "assessment.ts")]
pub struct GeneratedAssessment {
    pub title: String,
    pub description: String,
    pub questions: Vec<GeneratedQuestion>,
    pub total_marks: i32,
    pub estimated_duration: String,
    #[serde(default)]
    pub learning_objectives: Vec<String>,
    /// 模型输出无法解析时生成的兜底结果
    #[serde(default)]
    pub is_fallback: bool,
}

impl GeneratedAssessment {
    /// 按题目重新计算总分
    pub fn computed_total_marks(&self) -> i32 {
        self.questions.iter().map(|q| q.marks).sum()
    }
}
