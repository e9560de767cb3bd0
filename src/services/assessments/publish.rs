use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AssessmentService;
use crate::models::ApiResponse;
use crate::models::assessments::requests::PublishAssessmentRequest;
use crate::services::error_response;

pub async fn publish_assessment(
    service: &AssessmentService,
    request: &HttpRequest,
    req: PublishAssessmentRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.publish_assessment(req).await {
        Ok(published) => {
            info!(
                "Assessment template {} published as assignment {}",
                published.template.id, published.assignment.id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                published,
                "Assessment published successfully",
            )))
        }
        Err(e) => Ok(error_response(&e)),
    }
}
