//! AI 服务
//!
//! 文本提取、作业评分与测评生成三个叶子服务，均通过 OpenAI 兼容的
//! chat completions 接口调用模型。模型输出无法解析时返回带标记的兜底结果。

pub mod client;
pub mod extract;
pub mod generation;
pub mod scoring;

pub use client::{ChatCompletion, ChatMessage, ChatRequest, OpenAiChatClient};
pub use extract::{HttpTextFetcher, TextFetcher};

use once_cell::sync::Lazy;
use regex::Regex;

/// AI 叶子服务的结果
#[derive(Debug, Clone, PartialEq)]
pub enum AiOutcome<T> {
    /// 模型输出解析成功
    Genuine(T),
    /// 模型输出无法解析，使用兜底数据
    Fallback { data: T, reason: String },
}

impl<T> AiOutcome<T> {
    pub fn is_fallback(&self) -> bool {
        matches!(self, AiOutcome::Fallback { .. })
    }

    pub fn fallback_reason(&self) -> Option<&str> {
        match self {
            AiOutcome::Genuine(_) => None,
            AiOutcome::Fallback { reason, .. } => Some(reason),
        }
    }

    pub fn data(&self) -> &T {
        match self {
            AiOutcome::Genuine(data) | AiOutcome::Fallback { data, .. } => data,
        }
    }

    pub fn into_data(self) -> T {
        match self {
            AiOutcome::Genuine(data) | AiOutcome::Fallback { data, .. } => data,
        }
    }
}

static JSON_FENCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^\s*```(?:json|JSON)?\s*(.*?)\s*```\s*$").expect("Invalid json fence regex")
});

/// 去掉模型输出外层的 ```json 代码块
pub(crate) fn strip_json_fence(content: &str) -> &str {
    match JSON_FENCE_RE.captures(content).and_then(|c| c.get(1)) {
        Some(inner) => inner.as_str(),
        None => content.trim(),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! 按脚本返回内容的假模型客户端

    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::{ChatCompletion, ChatRequest, TextFetcher};
    use crate::errors::{EvalHubError, Result};

    #[derive(Default)]
    pub struct ScriptedChat {
        replies: Mutex<VecDeque<Result<String>>>,
        pub requests: Mutex<Vec<ChatRequest>>,
    }

    impl ScriptedChat {
        pub fn with_replies(replies: Vec<Result<String>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn reply(content: &str) -> Self {
            Self::with_replies(vec![Ok(content.to_string())])
        }

        pub fn call_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait::async_trait]
    impl ChatCompletion for ScriptedChat {
        async fn complete(&self, request: ChatRequest) -> Result<String> {
            self.requests.lock().unwrap().push(request);
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(EvalHubError::upstream("no scripted reply")))
        }
    }

    /// 固定返回文本的抓取器
    pub struct StaticFetcher(pub Result<String>);

    #[async_trait::async_trait]
    impl TextFetcher for StaticFetcher {
        async fn fetch_text(&self, _url: &str) -> Result<String> {
            self.0.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fence() {
        assert_eq!(strip_json_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_json_fence("  {\"a\":1} "), "{\"a\":1}");
        assert_eq!(strip_json_fence("```\n[1]\n```\n"), "[1]");
    }

    #[test]
    fn test_outcome_accessors() {
        let genuine = AiOutcome::Genuine(3);
        let fallback = AiOutcome::Fallback {
            data: 4,
            reason: "bad json".to_string(),
        };
        assert!(!genuine.is_fallback());
        assert!(fallback.is_fallback());
        assert_eq!(*fallback.data(), 4);
        assert_eq!(genuine.into_data(), 3);
    }
}
