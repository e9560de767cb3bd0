use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::config::AppConfig;
use crate::models::submissions::requests::SubmissionUpload;
use crate::models::{ApiResponse, ErrorCode};
use crate::pipeline::SubmitRequest;
use crate::services::{app_pipeline, error_response};
use crate::utils::read_multipart_form;

pub async fn create_submission(
    _service: &SubmissionService,
    request: &HttpRequest,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    let max_size = AppConfig::get().upload.max_size;

    let form = match read_multipart_form(payload, max_size).await {
        Ok(form) => form,
        Err(rejection) => return Ok(rejection.into_response()),
    };

    let Some(assignment_id) = form.field("assignment_id").map(str::to_string) else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "assignment_id is required",
        )));
    };
    let Some(student_name) = form.field("student_name").map(str::to_string) else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "student_name is required",
        )));
    };
    let student_id = form.field("student_id").map(str::to_string);

    let Some(file) = form.file else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::FileNotFound,
            "No file found in upload payload",
        )));
    };

    let pipeline = app_pipeline(request);
    let submit = SubmitRequest {
        assignment_id,
        student_id,
        student_name,
        upload: SubmissionUpload {
            file_name: file.file_name,
            content_type: file.content_type,
            bytes: file.bytes,
        },
    };

    match pipeline.submit(submit).await {
        Ok(submission) => Ok(HttpResponse::Created()
            .json(ApiResponse::success(submission, "Submission created successfully"))),
        Err(e) => Ok(error_response(&e)),
    }
}
