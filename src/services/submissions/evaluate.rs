use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::warn;

use super::SubmissionService;
use crate::models::ApiResponse;
use crate::models::evaluations::{
    requests::EvaluateSubmissionRequest, responses::AiEvaluationResponse,
};
use crate::services::{app_pipeline, error_response};

pub async fn evaluate_submission(
    _service: &SubmissionService,
    request: &HttpRequest,
    submission_id: String,
    body: Option<EvaluateSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    let pipeline = app_pipeline(request);
    let assignment_title = body.and_then(|b| b.assignment_title);

    match pipeline
        .evaluate_with_ai(&submission_id, assignment_title)
        .await
    {
        Ok(result) => {
            let message = if let Some(reason) = result.outcome.fallback_reason() {
                warn!(
                    "Submission {} scored with fallback feedback: {}",
                    submission_id, reason
                );
                "Evaluation completed with fallback feedback"
            } else {
                "Evaluation completed successfully"
            };
            let response = AiEvaluationResponse {
                evaluation_id: result.evaluation.id,
                evaluation: result.outcome.into_data(),
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(response, message)))
        }
        Err(e) => Ok(error_response(&e)),
    }
}
