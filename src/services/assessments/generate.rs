use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssessmentService;
use crate::ai::generation::{self, GenerationInput};
use crate::models::ApiResponse;
use crate::models::assessments::{
    requests::GenerateAssessmentRequest, responses::GenerateAssessmentResponse,
};
use crate::services::{app_pipeline, error_response};

pub async fn generate_assessment(
    _service: &AssessmentService,
    request: &HttpRequest,
    req: GenerateAssessmentRequest,
) -> ActixResult<HttpResponse> {
    let input = match GenerationInput::try_from(req) {
        Ok(input) => input,
        Err(e) => return Ok(error_response(&e)),
    };

    let pipeline = app_pipeline(request);

    match generation::generate_assessment(pipeline.chat(), &input).await {
        Ok(outcome) => {
            let message = if outcome.is_fallback() {
                "Assessment generated from fallback template"
            } else {
                "Assessment generated successfully"
            };
            let response = GenerateAssessmentResponse {
                success: true,
                assessment: outcome.into_data(),
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(response, message)))
        }
        Err(e) => Ok(error_response(&e)),
    }
}
