use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EvaluationService;
use crate::models::evaluations::requests::EvaluationListQuery;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;

pub async fn list_evaluations(
    service: &EvaluationService,
    request: &HttpRequest,
    query: EvaluationListQuery,
) -> ActixResult<HttpResponse> {
    if query
        .submission_id
        .as_deref()
        .is_some_and(|id| id.trim().is_empty())
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "submission_id cannot be blank",
        )));
    }

    let storage = service.get_storage(request);

    match storage.list_evaluations(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Evaluations retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
