use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AssignmentService, assignment_cache_key};
use crate::config::AppConfig;
use crate::models::assignments::entities::Assignment;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{app_cache, error_response};

pub async fn get_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: String,
) -> ActixResult<HttpResponse> {
    let cache = app_cache(request);
    let key = assignment_cache_key(&assignment_id);

    if let Some(assignment) = cache.get_json::<Assignment>(&key).await {
        return Ok(HttpResponse::Ok().json(ApiResponse::success(
            assignment,
            "Assignment retrieved successfully",
        )));
    }

    let storage = service.get_storage(request);

    match storage.get_assignment_by_id(&assignment_id).await {
        Ok(Some(assignment)) => {
            cache
                .insert_json(key, &assignment, AppConfig::get().cache.default_ttl)
                .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                assignment,
                "Assignment retrieved successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AssignmentNotFound,
            "Assignment not found",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn get_assignment_stats(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: String,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_assignment_by_id(&assignment_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::AssignmentNotFound,
                "Assignment not found",
            )));
        }
        Err(e) => return Ok(error_response(&e)),
    }

    match storage.get_assignment_stats(&assignment_id).await {
        Ok(stats) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            stats,
            "Assignment statistics retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
