//! 文本提取
//!
//! 图片交给视觉模型转写，纯文本直接抓取，PDF 与 Word 暂不支持。

use std::time::Duration;

use tracing::info;

use super::client::{ChatCompletion, ChatMessage, ChatRequest};
use crate::errors::{EvalHubError, Result};

const IMAGE_TRANSCRIPTION_PROMPT: &str = "\
Please extract all text content from this image. This appears to be a student assignment. \
Return only the text content, maintaining the original structure and formatting as much as possible.";

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp"];
const WORD_EXTENSIONS: &[&str] = &["doc", "docx"];

/// 按 MIME 提示与 URL 扩展名判定的文件类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Image,
    Pdf,
    Word,
    Text,
}

impl FileKind {
    pub fn classify(file_url: &str, file_type: Option<&str>) -> Self {
        let mime = file_type.unwrap_or_default().to_ascii_lowercase();
        let ext = url_extension(file_url);

        if mime.contains("image") || ext.as_deref().is_some_and(|e| IMAGE_EXTENSIONS.contains(&e)) {
            FileKind::Image
        } else if mime.contains("pdf") || ext.as_deref() == Some("pdf") {
            FileKind::Pdf
        } else if mime.contains("word") || ext.as_deref().is_some_and(|e| WORD_EXTENSIONS.contains(&e))
        {
            FileKind::Word
        } else {
            FileKind::Text
        }
    }
}

/// URL 路径部分的扩展名（小写，忽略查询串）
fn url_extension(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let last = path.rsplit('/').next().unwrap_or_default();
    last.rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
}

#[async_trait::async_trait]
pub trait TextFetcher: Send + Sync {
    /// 以文本方式读取 URL 内容
    async fn fetch_text(&self, url: &str) -> Result<String>;
}

/// reqwest 实现
#[derive(Clone)]
pub struct HttpTextFetcher {
    http: reqwest::Client,
}

impl HttpTextFetcher {
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| EvalHubError::configuration(format!("HTTP 客户端初始化失败: {e}")))?;
        Ok(Self { http })
    }
}

#[async_trait::async_trait]
impl TextFetcher for HttpTextFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| EvalHubError::fetch(format!("Failed to fetch {url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EvalHubError::fetch(format!(
                "Failed to fetch {url}: HTTP {status}"
            )));
        }

        response
            .text()
            .await
            .map_err(|e| EvalHubError::fetch(format!("Failed to read body of {url}: {e}")))
    }
}

/// 从文件 URL 提取文本
pub async fn extract_text(
    chat: &dyn ChatCompletion,
    fetcher: &dyn TextFetcher,
    file_url: &str,
    file_type: Option<&str>,
) -> Result<String> {
    if file_url.trim().is_empty() {
        return Err(EvalHubError::validation("File URL is required"));
    }

    let kind = FileKind::classify(file_url, file_type);
    info!(file_url, ?file_type, ?kind, "extracting text");

    let text = match kind {
        FileKind::Image => {
            chat.complete(ChatRequest {
                messages: vec![ChatMessage::user_with_image(
                    IMAGE_TRANSCRIPTION_PROMPT,
                    file_url,
                )],
                temperature: None,
                max_tokens: 2000,
            })
            .await?
        }
        FileKind::Pdf => {
            return Err(EvalHubError::unsupported_format(
                "PDF text extraction is not supported",
            ));
        }
        FileKind::Word => {
            return Err(EvalHubError::unsupported_format(
                "Word document text extraction is not supported",
            ));
        }
        FileKind::Text => fetcher.fetch_text(file_url).await?,
    };

    info!(file_url, text_len = text.len(), "text extraction complete");
    Ok(text)
}
