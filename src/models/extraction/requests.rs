use serde::Deserialize;
use ts_rs::TS;

/// 文本提取请求
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "extraction.ts")]
pub struct ExtractTextRequest {
    pub file_url: String,
    pub file_type: Option<String>,
}
