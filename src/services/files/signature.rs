use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::FileService;
use crate::blob::{self, SIGNATURE_BUCKET};
use crate::config::AppConfig;
use crate::models::files::responses::FileUploadResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{app_blobs, error_response};
use crate::utils::file_magic::SIGNATURE_EXTENSIONS;
use crate::utils::{read_multipart_form, validate_magic_bytes};

pub async fn upload_signature(
    _service: &FileService,
    request: &HttpRequest,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    let max_size = AppConfig::get().upload.max_size;

    let form = match read_multipart_form(payload, max_size).await {
        Ok(form) => form,
        Err(rejection) => return Ok(rejection.into_response()),
    };
    let Some(file) = form.file else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::FileNotFound,
            "No file found in upload payload",
        )));
    };

    // 仅接受图片，并校验内容与扩展名一致
    let extension = blob::file_extension(&file.file_name);
    if !SIGNATURE_EXTENSIONS.contains(&extension.as_str()) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::FileTypeNotAllowed,
            "Signature must be an image",
        )));
    }
    if !validate_magic_bytes(&file.bytes, &extension) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::FileTypeNotAllowed,
            "文件内容与扩展名不匹配",
        )));
    }

    let blobs = app_blobs(request);
    let stem = format!("signature-{}", chrono::Utc::now().timestamp_millis());

    let path = match blob::upload_unique(
        blobs.as_ref(),
        SIGNATURE_BUCKET,
        "signatures",
        &stem,
        &extension,
        &file.bytes,
    )
    .await
    {
        Ok(path) => path,
        Err(e) => return Ok(error_response(&e)),
    };

    info!("Signature uploaded to {}/{}", SIGNATURE_BUCKET, path);

    let response = FileUploadResponse {
        bucket: SIGNATURE_BUCKET.to_string(),
        url: blobs.public_url(SIGNATURE_BUCKET, &path),
        path,
        file_name: file.file_name,
        size: file.bytes.len() as i64,
        content_type: file.content_type,
        uploaded_at: chrono::Utc::now(),
    };

    Ok(HttpResponse::Created().json(ApiResponse::success(
        response,
        "Signature uploaded successfully",
    )))
}
