use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssessmentService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;

pub async fn list_templates(
    service: &AssessmentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_templates().await {
        Ok(templates) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            templates,
            "Templates retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn get_template(
    service: &AssessmentService,
    request: &HttpRequest,
    template_id: String,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_template_with_questions(&template_id).await {
        Ok(Some(detail)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            detail,
            "Template retrieved successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Template not found",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
