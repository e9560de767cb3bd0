use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EvaluationService;
use crate::models::ApiResponse;
use crate::models::evaluations::requests::CreateManualEvaluationRequest;
use crate::services::{app_pipeline, error_response};

pub async fn create_manual_evaluation(
    _service: &EvaluationService,
    request: &HttpRequest,
    req: CreateManualEvaluationRequest,
) -> ActixResult<HttpResponse> {
    let pipeline = app_pipeline(request);

    match pipeline.create_manual_evaluation(req).await {
        Ok(evaluation) => Ok(HttpResponse::Created().json(ApiResponse::success(
            evaluation,
            "Evaluation saved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
