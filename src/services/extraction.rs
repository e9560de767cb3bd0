//! 文本提取接口

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::warn;

use crate::ai::extract;
use crate::models::extraction::{requests::ExtractTextRequest, responses::ExtractTextResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{app_pipeline, status_for};

pub struct ExtractionService;

impl ExtractionService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub async fn extract_text(
        &self,
        request: &HttpRequest,
        req: ExtractTextRequest,
    ) -> ActixResult<HttpResponse> {
        let pipeline = app_pipeline(request);

        match extract::extract_text(
            pipeline.chat(),
            pipeline.fetcher(),
            &req.file_url,
            req.file_type.as_deref(),
        )
        .await
        {
            Ok(text) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                ExtractTextResponse {
                    success: true,
                    extracted_text: text,
                    file_type: req.file_type,
                    error: None,
                },
                "Text extracted successfully",
            ))),
            Err(e) => {
                warn!("Text extraction failed for {}: {}", req.file_url, e);
                let message = e.message().to_string();
                Ok(HttpResponse::build(status_for(&e)).json(ApiResponse::error(
                    ErrorCode::from(&e),
                    ExtractTextResponse::failed(req.file_type, message.clone()),
                    message,
                )))
            }
        }
    }
}
