//! multipart 表单读取
//!
//! 文本字段收集为键值对，仅允许一个名为 `file` 的文件字段。

use std::collections::HashMap;

use actix_multipart::Multipart;
use actix_web::HttpResponse;
use futures_util::TryStreamExt;
use futures_util::stream::StreamExt;

use crate::models::{ApiResponse, ErrorCode};

/// 表单中的文件
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct MultipartForm {
    pub fields: HashMap<String, String>,
    pub file: Option<UploadedFile>,
}

impl MultipartForm {
    /// 去掉首尾空白后的非空字段
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

/// 表单读取失败的原因，可直接转为响应
#[derive(Debug)]
pub struct UploadRejection {
    pub code: ErrorCode,
    pub message: String,
}

impl UploadRejection {
    fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn into_response(self) -> HttpResponse {
        HttpResponse::BadRequest().json(ApiResponse::error_empty(self.code, self.message))
    }
}

pub async fn read_multipart_form(
    mut payload: Multipart,
    max_size: usize,
) -> Result<MultipartForm, UploadRejection> {
    let mut form = MultipartForm::default();

    while let Some(mut field) = payload.try_next().await.map_err(|e| {
        UploadRejection::new(ErrorCode::BadRequest, format!("Malformed multipart body: {e}"))
    })? {
        let content_disposition = field.content_disposition();
        let name = content_disposition
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();
        let file_name = content_disposition
            .and_then(|cd| cd.get_filename())
            .map(|s| s.to_string());

        if name == "file" {
            if form.file.is_some() {
                return Err(UploadRejection::new(
                    ErrorCode::MultifileUploadNotAllowed,
                    "Only one file can be uploaded at a time",
                ));
            }

            let content_type = field
                .content_type()
                .map(|ct| ct.to_string())
                .unwrap_or_else(|| "application/octet-stream".to_string());

            let mut bytes = Vec::new();
            while let Some(chunk) = field.next().await {
                let data = chunk.map_err(|e| {
                    UploadRejection::new(ErrorCode::FileUploadFailed, format!("Upload interrupted: {e}"))
                })?;
                // 校验大小
                if bytes.len() + data.len() > max_size {
                    return Err(UploadRejection::new(
                        ErrorCode::FileSizeExceeded,
                        "File size exceeds the limit",
                    ));
                }
                bytes.extend_from_slice(&data);
            }

            form.file = Some(UploadedFile {
                file_name: file_name.unwrap_or_else(|| "upload.bin".to_string()),
                content_type,
                bytes,
            });
        } else if !name.is_empty() {
            let mut value = Vec::new();
            while let Some(chunk) = field.next().await {
                let data = chunk.map_err(|e| {
                    UploadRejection::new(ErrorCode::BadRequest, format!("Malformed field {name}: {e}"))
                })?;
                value.extend_from_slice(&data);
            }
            let value = String::from_utf8(value).map_err(|_| {
                UploadRejection::new(ErrorCode::BadRequest, format!("Field {name} is not valid UTF-8"))
            })?;
            form.fields.insert(name, value);
        }
    }

    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_trims_and_skips_blank() {
        let mut form = MultipartForm::default();
        form.fields.insert("student_name".into(), "  Ada  ".into());
        form.fields.insert("student_id".into(), "   ".into());

        assert_eq!(form.field("student_name"), Some("Ada"));
        assert_eq!(form.field("student_id"), None);
        assert_eq!(form.field("missing"), None);
    }
}
