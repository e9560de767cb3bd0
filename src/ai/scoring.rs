//! 作业评分

use serde::Deserialize;
use tracing::{info, warn};

use super::client::{ChatCompletion, ChatMessage, ChatRequest};
use super::{AiOutcome, strip_json_fence};
use crate::errors::Result;
use crate::models::evaluations::entities::AiFeedback;

const SCORING_SYSTEM_PROMPT: &str =
    "You are an expert academic evaluator. Always respond with valid JSON format.";

/// 评分输入
#[derive(Debug, Clone)]
pub struct ScoringInput<'a> {
    pub assignment_title: Option<&'a str>,
    pub assignment_description: Option<&'a str>,
    pub max_score: i32,
    pub student_response: &'a str,
}

fn build_prompt(input: &ScoringInput<'_>) -> String {
    let max_score = input.max_score;
    format!(
        r#"
You are an expert academic evaluator. Please evaluate this student's assignment submission.

Assignment Title: {title}
Assignment Description: {description}
Maximum Score: {max_score}

Student's Response:
{response}

Please provide a comprehensive evaluation in the following JSON format:
{{
  "score": <number between 0 and {max_score}>,
  "percentage": <percentage score>,
  "strengths": [
    "<strength 1>",
    "<strength 2>",
    "<strength 3>"
  ],
  "improvements": [
    "<area for improvement 1>",
    "<area for improvement 2>",
    "<area for improvement 3>"
  ],
  "detailed_feedback": "<comprehensive paragraph explaining the evaluation>",
  "recommendations": [
    "<recommendation 1>",
    "<recommendation 2>",
    "<recommendation 3>"
  ],
  "overall_comments": "<overall assessment and encouragement>"
}}

Evaluate based on:
1. Content accuracy and understanding
2. Completeness of the response
3. Clarity and organization
4. Critical thinking and analysis
5. Use of examples and evidence

Be constructive, specific, and encouraging in your feedback."#,
        title = input
            .assignment_title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or("Assignment Evaluation"),
        description = input
            .assignment_description
            .filter(|d| !d.trim().is_empty())
            .unwrap_or("General assignment evaluation"),
        response = input.student_response,
    )
}

/// 模型输出无法解析时的兜底评分：满分的 70%
pub fn fallback_feedback(max_score: i32) -> AiFeedback {
    AiFeedback {
        score: (f64::from(max_score) * 0.7).round(),
        percentage: 70.0,
        strengths: vec![
            "Good effort demonstrated".to_string(),
            "Shows understanding of basic concepts".to_string(),
        ],
        improvements: vec![
            "Could elaborate more on key points".to_string(),
            "Consider adding more examples".to_string(),
        ],
        detailed_feedback: "The submission shows a good understanding of the subject matter. \
            There is room for improvement in elaboration and providing more concrete examples."
            .to_string(),
        recommendations: vec![
            "Review course materials".to_string(),
            "Practice with more examples".to_string(),
        ],
        overall_comments: "Keep up the good work and continue learning!".to_string(),
        is_fallback: true,
    }
}

/// 模型原始输出，只有 score 是必需的
#[derive(Debug, Deserialize)]
struct RawFeedback {
    score: f64,
    percentage: Option<f64>,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    improvements: Vec<String>,
    #[serde(default)]
    detailed_feedback: String,
    #[serde(default)]
    recommendations: Vec<String>,
    #[serde(default)]
    overall_comments: String,
}

/// 按满分计算百分比，保留一位小数
pub(crate) fn percentage_of(score: f64, max_score: i32) -> f64 {
    if max_score <= 0 {
        return 0.0;
    }
    (score / f64::from(max_score) * 1000.0).round() / 10.0
}

/// 解析模型输出
///
/// 缺少 percentage 时按 score 计算；score 缺失或不是数字时视为解析失败。
pub fn parse_feedback(content: &str, max_score: i32) -> AiOutcome<AiFeedback> {
    match serde_json::from_str::<RawFeedback>(strip_json_fence(content)) {
        Ok(raw) if raw.score.is_finite() => {
            let percentage = raw
                .percentage
                .filter(|p| p.is_finite())
                .unwrap_or_else(|| percentage_of(raw.score, max_score));
            AiOutcome::Genuine(AiFeedback {
                score: raw.score,
                percentage,
                strengths: raw.strengths,
                improvements: raw.improvements,
                detailed_feedback: raw.detailed_feedback,
                recommendations: raw.recommendations,
                overall_comments: raw.overall_comments,
                is_fallback: false,
            })
        }
        Ok(_) => AiOutcome::Fallback {
            data: fallback_feedback(max_score),
            reason: "score is not a finite number".to_string(),
        },
        Err(e) => AiOutcome::Fallback {
            data: fallback_feedback(max_score),
            reason: e.to_string(),
        },
    }
}

/// 调用模型为学生作答评分
///
/// 传输失败或非 2xx 返回错误；模型输出不是合法 JSON 时返回兜底结果。
pub async fn score_submission(
    chat: &dyn ChatCompletion,
    input: &ScoringInput<'_>,
) -> Result<AiOutcome<AiFeedback>> {
    info!(
        max_score = input.max_score,
        response_len = input.student_response.len(),
        "scoring submission"
    );

    let content = chat
        .complete(ChatRequest {
            messages: vec![
                ChatMessage::system(SCORING_SYSTEM_PROMPT),
                ChatMessage::user(build_prompt(input)),
            ],
            temperature: Some(0.3),
            max_tokens: 2000,
        })
        .await?;

    let outcome = parse_feedback(&content, input.max_score);
    if let AiOutcome::Fallback { reason, .. } = &outcome {
        warn!("Failed to parse scoring response, using fallback: {}", reason);
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::client::MessageContent;
    use crate::ai::testing::ScriptedChat;
    use crate::errors::EvalHubError;

    fn input(max_score: i32) -> ScoringInput<'static> {
        ScoringInput {
            assignment_title: Some("Photosynthesis"),
            assignment_description: None,
            max_score,
            student_response: "Plants convert light into chemical energy.",
        }
    }

    #[tokio::test]
    async fn test_genuine_json_in_fence() {
        let chat = ScriptedChat::reply(
            "```json\n{\"score\": 62, \"percentage\": 88.6, \"strengths\": [\"clear\"], \
             \"improvements\": [], \"detailed_feedback\": \"good\", \"recommendations\": [], \
             \"overall_comments\": \"well done\"}\n```",
        );

        let outcome = score_submission(&chat, &input(70)).await.unwrap();
        assert!(!outcome.is_fallback());
        assert_eq!(outcome.data().score, 62.0);
        assert_eq!(outcome.data().strengths, vec!["clear".to_string()]);

        let requests = chat.requests.lock().unwrap();
        assert_eq!(requests[0].temperature, Some(0.3));
        assert_eq!(requests[0].max_tokens, 2000);
        match &requests[0].messages[1].content {
            MessageContent::Text(prompt) => {
                assert!(prompt.contains("Assignment Title: Photosynthesis"));
                assert!(prompt.contains("Assignment Description: General assignment evaluation"));
                assert!(prompt.contains("Maximum Score: 70"));
            }
            other => panic!("unexpected content: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_falls_back() {
        let chat = ScriptedChat::reply("I think this deserves a B+.");
        let outcome = score_submission(&chat, &input(70)).await.unwrap();

        assert!(outcome.is_fallback());
        let feedback = outcome.into_data();
        assert_eq!(feedback.score, 49.0);
        assert_eq!(feedback.percentage, 70.0);
        assert!(feedback.is_fallback);
        assert_eq!(feedback.strengths.len(), 2);
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let chat = ScriptedChat::with_replies(vec![Err(EvalHubError::upstream("502"))]);
        let err = score_submission(&chat, &input(100)).await.unwrap_err();
        assert_eq!(err.code(), "E015");
    }

    #[test]
    fn test_missing_percentage_is_computed() {
        let outcome = parse_feedback(r#"{"score": 62, "strengths": ["x"]}"#, 70);
        assert!(!outcome.is_fallback());
        let feedback = outcome.into_data();
        assert_eq!(feedback.score, 62.0);
        assert_eq!(feedback.percentage, 88.6);
        assert_eq!(feedback.strengths, vec!["x".to_string()]);
        assert!(feedback.improvements.is_empty());
    }

    #[test]
    fn test_missing_or_textual_score_falls_back() {
        assert!(parse_feedback(r#"{"percentage": 80}"#, 70).is_fallback());
        assert!(parse_feedback(r#"{"score": "sixty"}"#, 70).is_fallback());
    }

    #[test]
    fn test_percentage_of() {
        assert_eq!(percentage_of(70.0, 70), 100.0);
        assert_eq!(percentage_of(1.0, 3), 33.3);
        assert_eq!(percentage_of(5.0, 0), 0.0);
    }

    #[test]
    fn test_fallback_rounds() {
        assert_eq!(fallback_feedback(100).score, 70.0);
        assert_eq!(fallback_feedback(3).score, 2.0);
    }
}
