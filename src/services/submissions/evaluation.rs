use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::models::evaluations::requests::CurrentEvaluationQuery;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{app_pipeline, error_response};

pub async fn current_evaluation(
    _service: &SubmissionService,
    request: &HttpRequest,
    submission_id: String,
    query: CurrentEvaluationQuery,
) -> ActixResult<HttpResponse> {
    let pipeline = app_pipeline(request);

    match pipeline
        .resolve_current_evaluation(&submission_id, query.view)
        .await
    {
        Ok(Some(evaluation)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            evaluation,
            "Current evaluation retrieved successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::EvaluationNotFound,
            "No evaluation available for this submission",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
