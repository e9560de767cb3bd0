pub mod assessments;
pub mod assignments;
pub mod evaluations;
pub mod extraction;
pub mod files;
pub mod submissions;

pub use assessments::AssessmentService;
pub use assignments::AssignmentService;
pub use evaluations::EvaluationService;
pub use extraction::ExtractionService;
pub use files::FileService;
pub use submissions::SubmissionService;

use actix_web::{HttpRequest, HttpResponse, http::StatusCode};
use std::sync::Arc;
use tracing::error;

use crate::blob::BlobStore;
use crate::cache::ObjectCache;
use crate::errors::EvalHubError;
use crate::models::ApiResponse;
use crate::pipeline::EvaluationPipeline;

/// 错误对应的 HTTP 状态码
pub(crate) fn status_for(err: &EvalHubError) -> StatusCode {
    match err {
        EvalHubError::Validation(_) => StatusCode::BAD_REQUEST,
        EvalHubError::NotFound(_) => StatusCode::NOT_FOUND,
        EvalHubError::ScoreOutOfRange(_) => StatusCode::UNPROCESSABLE_ENTITY,
        EvalHubError::EvaluationInProgress(_) | EvalHubError::InvalidStatusTransition(_) => {
            StatusCode::CONFLICT
        }
        EvalHubError::UnsupportedFormat(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        EvalHubError::Fetch(_) | EvalHubError::Upstream(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// 将业务错误转换为统一的错误响应
pub(crate) fn error_response(err: &EvalHubError) -> HttpResponse {
    let status = status_for(err);
    if status.is_server_error() {
        error!("{}", err);
    }
    HttpResponse::build(status).json(ApiResponse::from_error(err))
}

pub(crate) fn app_pipeline(request: &HttpRequest) -> Arc<EvaluationPipeline> {
    request
        .app_data::<actix_web::web::Data<Arc<EvaluationPipeline>>>()
        .expect("EvaluationPipeline not found in app data")
        .get_ref()
        .clone()
}

pub(crate) fn app_blobs(request: &HttpRequest) -> Arc<dyn BlobStore> {
    request
        .app_data::<actix_web::web::Data<Arc<dyn BlobStore>>>()
        .expect("BlobStore not found in app data")
        .get_ref()
        .clone()
}

pub(crate) fn app_cache(request: &HttpRequest) -> Arc<dyn ObjectCache> {
    request
        .app_data::<actix_web::web::Data<Arc<dyn ObjectCache>>>()
        .expect("ObjectCache not found in app data")
        .get_ref()
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ErrorCode;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&EvalHubError::score_out_of_range("80 > 70")),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_for(&EvalHubError::evaluation_in_progress("busy")),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_for(&EvalHubError::unsupported_format("msword")),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(
            status_for(&EvalHubError::upstream("502")),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(&EvalHubError::database_operation("locked")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_code_mapping() {
        assert_eq!(
            ErrorCode::from(&EvalHubError::not_found("x")),
            ErrorCode::NotFound
        );
        assert_eq!(
            ErrorCode::from(&EvalHubError::fetch("timeout")),
            ErrorCode::ExtractionFailed
        );
    }
}
