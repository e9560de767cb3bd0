use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::header};

use super::FileService;
use crate::blob::{self, content_type_for};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{app_blobs, error_response};

pub async fn serve_blob(
    _service: &FileService,
    request: &HttpRequest,
    bucket: String,
    path: String,
) -> ActixResult<HttpResponse> {
    if let Err(e) = blob::validate_object_path(&bucket, &path) {
        return Ok(error_response(&e));
    }

    let blobs = app_blobs(request);

    match blobs.get(&bucket, &path).await {
        Ok(Some(bytes)) => Ok(HttpResponse::Ok()
            .insert_header((header::CONTENT_TYPE, content_type_for(&path)))
            .body(bytes)),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::FileNotFound,
            "File not found",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
