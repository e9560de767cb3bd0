use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SubmissionService;
use crate::models::ApiResponse;
use crate::services::{app_pipeline, error_response};

pub async fn mark_graded(
    _service: &SubmissionService,
    request: &HttpRequest,
    submission_id: String,
) -> ActixResult<HttpResponse> {
    let pipeline = app_pipeline(request);

    match pipeline.mark_graded(&submission_id).await {
        Ok(submission) => {
            info!("Submission {} marked as graded", submission.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                submission,
                "Submission marked as graded",
            )))
        }
        Err(e) => Ok(error_response(&e)),
    }
}
