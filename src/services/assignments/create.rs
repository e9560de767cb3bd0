use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{AssignmentService, assignment_cache_key};
use crate::config::AppConfig;
use crate::models::assignments::requests::CreateAssignmentRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{app_cache, error_response};

/// 校验创建参数，返回错误信息
pub(crate) fn validate_create_request(req: &CreateAssignmentRequest) -> Option<String> {
    if req.title.trim().is_empty() {
        return Some("Assignment title is required".to_string());
    }
    if let Some(max) = req.max_score
        && max <= 0
    {
        return Some(format!("Max score must be greater than 0, got {max}"));
    }
    if let Some(total) = req.total_marks
        && total < 0
    {
        return Some(format!("Total marks cannot be negative, got {total}"));
    }
    None
}

pub async fn create_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    mut req: CreateAssignmentRequest,
) -> ActixResult<HttpResponse> {
    if let Some(message) = validate_create_request(&req) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, message)));
    }
    req.title = req.title.trim().to_string();

    let storage = service.get_storage(request);

    match storage.create_assignment(req).await {
        Ok(assignment) => {
            info!("Assignment {} created ({})", assignment.title, assignment.id);
            app_cache(request)
                .insert_json(
                    assignment_cache_key(&assignment.id),
                    &assignment,
                    AppConfig::get().cache.default_ttl,
                )
                .await;
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(assignment, "Assignment created successfully")))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(title: &str, max_score: Option<i32>) -> CreateAssignmentRequest {
        CreateAssignmentRequest {
            title: title.to_string(),
            description: None,
            max_score,
            total_marks: None,
            template_id: None,
            created_by: None,
        }
    }

    #[test]
    fn test_validate_create_request() {
        assert!(validate_create_request(&request("Essay", Some(70))).is_none());
        assert!(validate_create_request(&request("Essay", None)).is_none());
        assert!(validate_create_request(&request("   ", Some(70))).is_some());
        assert!(validate_create_request(&request("Essay", Some(0))).is_some());
    }
}
