//! 测评生成

use serde::Deserialize;
use tracing::{info, warn};

use super::client::{ChatCompletion, ChatMessage, ChatRequest};
use super::{AiOutcome, strip_json_fence};
use crate::errors::{EvalHubError, Result};
use crate::models::assessments::{
    entities::{DifficultyLevel, GeneratedAssessment, GeneratedQuestion, QuestionType},
    requests::GenerateAssessmentRequest,
};

const GENERATION_SYSTEM_PROMPT: &str = "You are an expert academic assessment creator. \
Always respond with valid JSON format that matches the specified structure exactly.";

/// 单次生成的题目数上限
pub const MAX_QUESTIONS: i32 = 50;
/// 兜底题目的分值
const FALLBACK_QUESTION_MARKS: i32 = 10;

/// 校验后的生成参数
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationInput {
    pub topic: String,
    pub title: String,
    pub description: String,
    pub total_questions: i32,
    pub difficulty: DifficultyLevel,
}

impl TryFrom<GenerateAssessmentRequest> for GenerationInput {
    type Error = EvalHubError;

    fn try_from(req: GenerateAssessmentRequest) -> Result<Self> {
        let topic = req.topic.trim().to_string();
        if topic.is_empty() {
            return Err(EvalHubError::validation("Topic is required"));
        }
        if req.total_questions <= 0 || req.total_questions > MAX_QUESTIONS {
            return Err(EvalHubError::validation(format!(
                "Total questions must be between 1 and {MAX_QUESTIONS}"
            )));
        }

        let title = req
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| format!("Assessment on {topic}"));
        let description = req
            .description
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| format!("Comprehensive assessment covering {topic}"));

        Ok(Self {
            topic,
            title,
            description,
            total_questions: req.total_questions,
            difficulty: req.difficulty_level.unwrap_or_default(),
        })
    }
}

fn build_prompt(input: &GenerationInput) -> String {
    format!(
        r#"
Create a comprehensive academic assessment on the topic: "{topic}"

Requirements:
- Difficulty Level: {difficulty}
- Number of Questions: {total}
- Assessment Title: {title}
- Description: {description}

Please provide a well-structured assessment in the following JSON format:
{{
  "title": "<assessment title>",
  "description": "<assessment description>",
  "questions": [
    {{
      "question_text": "<question text>",
      "question_type": "essay|multiple_choice|short_answer",
      "marks": <marks for this question>,
      "order_index": <question number starting from 1>,
      "sample_answer": "<brief sample answer or key points>",
      "difficulty": "easy|medium|hard"
    }}
  ],
  "total_marks": <sum of all question marks>,
  "estimated_duration": "<estimated time to complete>",
  "learning_objectives": [
    "<objective 1>",
    "<objective 2>"
  ]
}}

Guidelines:
1. Distribute marks appropriately across questions (typically 5-20 marks per question)
2. Include a mix of question types if appropriate
3. Ensure questions test different cognitive levels (knowledge, understanding, application, analysis)
4. Make questions clear and specific
5. For {difficulty} difficulty, adjust complexity accordingly
6. Ensure total marks add up correctly
"#,
        topic = input.topic,
        difficulty = input.difficulty,
        total = input.total_questions,
        title = input.title,
        description = input.description,
    )
}

/// 兜底测评：n 道各 10 分的论述题
pub fn fallback_assessment(input: &GenerationInput) -> GeneratedAssessment {
    let topic = &input.topic;
    let n = input.total_questions;

    let questions = (1..=n)
        .map(|i| GeneratedQuestion {
            question_text: format!("Question {i}: Write a comprehensive answer about {topic}."),
            question_type: QuestionType::Essay,
            marks: FALLBACK_QUESTION_MARKS,
            order_index: i,
            sample_answer: Some(format!(
                "Students should demonstrate understanding of key concepts in {topic}"
            )),
            difficulty: Some(input.difficulty),
        })
        .collect();

    GeneratedAssessment {
        title: input.title.clone(),
        description: input.description.clone(),
        questions,
        total_marks: n * FALLBACK_QUESTION_MARKS,
        estimated_duration: format!("{} minutes", (n * 15).max(30)),
        learning_objectives: vec![
            format!("Understand key concepts in {topic}"),
            format!("Apply knowledge of {topic} to practical scenarios"),
        ],
        is_fallback: true,
    }
}

// 模型原始输出，字段宽松
#[derive(Deserialize)]
struct RawAssessment {
    title: Option<String>,
    description: Option<String>,
    questions: Vec<RawQuestion>,
    estimated_duration: Option<String>,
    #[serde(default)]
    learning_objectives: Vec<String>,
}

#[derive(Deserialize)]
struct RawQuestion {
    question_text: String,
    question_type: Option<String>,
    marks: f64,
    order_index: Option<f64>,
    sample_answer: Option<String>,
    difficulty: Option<String>,
}

impl RawAssessment {
    fn normalize(self, input: &GenerationInput) -> std::result::Result<GeneratedAssessment, String> {
        if self.questions.is_empty() {
            return Err("model returned no questions".to_string());
        }

        // 每道题分值必须为正
        let questions = self
            .questions
            .into_iter()
            .enumerate()
            .map(|(i, q)| {
                let marks = q.marks.round();
                if !marks.is_finite() || marks <= 0.0 {
                    return Err(format!("question {} has non-positive marks {}", i + 1, q.marks));
                }
                Ok(GeneratedQuestion {
                    question_text: q.question_text,
                    question_type: q
                        .question_type
                        .and_then(|t| t.parse().ok())
                        .unwrap_or(QuestionType::Essay),
                    marks: marks as i32,
                    order_index: q.order_index.map(|o| o as i32).unwrap_or(i as i32 + 1),
                    sample_answer: q.sample_answer,
                    difficulty: q.difficulty.and_then(|d| d.parse().ok()),
                })
            })
            .collect::<std::result::Result<Vec<GeneratedQuestion>, String>>()?;

        // 总分以题目分值之和为准
        let total_marks = questions.iter().map(|q| q.marks).sum();

        Ok(GeneratedAssessment {
            title: self
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| input.title.clone()),
            description: self
                .description
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| input.description.clone()),
            questions,
            total_marks,
            estimated_duration: self.estimated_duration.unwrap_or_default(),
            learning_objectives: self.learning_objectives,
            is_fallback: false,
        })
    }
}

/// 解析模型输出
pub fn parse_assessment(content: &str, input: &GenerationInput) -> AiOutcome<GeneratedAssessment> {
    let parsed = serde_json::from_str::<RawAssessment>(strip_json_fence(content))
        .map_err(|e| e.to_string())
        .and_then(|raw| raw.normalize(input));

    match parsed {
        Ok(assessment) => AiOutcome::Genuine(assessment),
        Err(reason) => AiOutcome::Fallback {
            data: fallback_assessment(input),
            reason,
        },
    }
}

/// 调用模型生成测评
pub async fn generate_assessment(
    chat: &dyn ChatCompletion,
    input: &GenerationInput,
) -> Result<AiOutcome<GeneratedAssessment>> {
    info!(
        topic = %input.topic,
        total_questions = input.total_questions,
        difficulty = %input.difficulty,
        "generating assessment"
    );

    let content = chat
        .complete(ChatRequest {
            messages: vec![
                ChatMessage::system(GENERATION_SYSTEM_PROMPT),
                ChatMessage::user(build_prompt(input)),
            ],
            temperature: Some(0.7),
            max_tokens: 3000,
        })
        .await?;

    let outcome = parse_assessment(&content, input);
    if let AiOutcome::Fallback { reason, .. } = &outcome {
        warn!("Failed to parse generated assessment, using fallback: {}", reason);
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::testing::ScriptedChat;

    fn request(topic: &str, total_questions: i32) -> GenerateAssessmentRequest {
        GenerateAssessmentRequest {
            topic: topic.to_string(),
            title: None,
            description: None,
            total_questions,
            difficulty_level: None,
        }
    }

    #[test]
    fn test_input_validation() {
        assert!(GenerationInput::try_from(request("  ", 3)).is_err());
        assert!(GenerationInput::try_from(request("Rust", 0)).is_err());
        assert!(GenerationInput::try_from(request("Rust", 51)).is_err());

        let input = GenerationInput::try_from(request("Rust", 3)).unwrap();
        assert_eq!(input.title, "Assessment on Rust");
        assert_eq!(input.difficulty, DifficultyLevel::Medium);
    }

    #[tokio::test]
    async fn test_generated_assessment_is_normalized() {
        let chat = ScriptedChat::reply(
            r#"{"title": "Ownership Quiz", "description": "Borrowing rules",
                "questions": [
                  {"question_text": "What is a move?", "question_type": "short_answer", "marks": 5, "order_index": 1},
                  {"question_text": "Explain lifetimes.", "question_type": "true_false", "marks": 15.0}
                ],
                "total_marks": 100, "estimated_duration": "40 minutes",
                "learning_objectives": ["Ownership"]}"#,
        );
        let input = GenerationInput::try_from(request("Rust", 2)).unwrap();

        let outcome = generate_assessment(&chat, &input).await.unwrap();
        assert!(!outcome.is_fallback());
        let assessment = outcome.into_data();
        assert_eq!(assessment.title, "Ownership Quiz");
        assert_eq!(assessment.total_marks, 20);
        assert_eq!(assessment.questions[0].question_type, QuestionType::ShortAnswer);
        assert_eq!(assessment.questions[1].question_type, QuestionType::Essay);
        assert_eq!(assessment.questions[1].order_index, 2);

        let requests = chat.requests.lock().unwrap();
        assert_eq!(requests[0].temperature, Some(0.7));
        assert_eq!(requests[0].max_tokens, 3000);
    }

    #[tokio::test]
    async fn test_unparseable_output_falls_back() {
        let chat = ScriptedChat::reply("Sure! Here are some questions...");
        let input = GenerationInput::try_from(request("Photosynthesis", 3)).unwrap();

        let outcome = generate_assessment(&chat, &input).await.unwrap();
        assert!(outcome.is_fallback());
        let assessment = outcome.into_data();
        assert!(assessment.is_fallback);
        assert_eq!(assessment.questions.len(), 3);
        assert_eq!(assessment.total_marks, 30);
        assert_eq!(assessment.estimated_duration, "45 minutes");
        assert_eq!(
            assessment.questions[0].question_text,
            "Question 1: Write a comprehensive answer about Photosynthesis."
        );
        assert_eq!(assessment.learning_objectives.len(), 2);
    }

    #[test]
    fn test_zero_mark_question_falls_back() {
        let input = GenerationInput::try_from(request("Rust", 2)).unwrap();
        let outcome = parse_assessment(
            r#"{"questions": [
                  {"question_text": "What is a move?", "marks": 10},
                  {"question_text": "Explain lifetimes.", "marks": 0}
                ]}"#,
            &input,
        );
        assert!(outcome.is_fallback());
        assert!(outcome.fallback_reason().unwrap().contains("question 2"));
        assert!(outcome.data().questions.iter().all(|q| q.marks > 0));
    }

    #[test]
    fn test_fallback_minimum_duration() {
        let input = GenerationInput::try_from(request("Rust", 1)).unwrap();
        assert_eq!(fallback_assessment(&input).estimated_duration, "30 minutes");
    }
}
