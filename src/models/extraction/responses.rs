use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "extraction.ts")]
pub struct ExtractTextResponse {
    pub success: bool,
    pub extracted_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtractTextResponse {
    pub fn failed(file_type: Option<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            extracted_text: String::new(),
            file_type,
            error: Some(error.into()),
        }
    }
}
