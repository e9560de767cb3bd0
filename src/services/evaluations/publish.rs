use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::EvaluationService;
use crate::models::ApiResponse;
use crate::services::{app_pipeline, error_response};

pub async fn publish_evaluation(
    _service: &EvaluationService,
    request: &HttpRequest,
    evaluation_id: String,
) -> ActixResult<HttpResponse> {
    let pipeline = app_pipeline(request);

    match pipeline.publish_evaluation(&evaluation_id).await {
        Ok(evaluation) => {
            info!(
                "Evaluation {} published for submission {}",
                evaluation.id, evaluation.submission_id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                evaluation,
                "Evaluation published successfully",
            )))
        }
        Err(e) => Ok(error_response(&e)),
    }
}
