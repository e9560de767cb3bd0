use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::RateLimit;
use crate::models::extraction::requests::ExtractTextRequest;
use crate::services::ExtractionService;

static EXTRACTION_SERVICE: Lazy<ExtractionService> = Lazy::new(ExtractionService::new_lazy);

pub async fn extract_text(
    req: HttpRequest,
    extract_data: web::Json<ExtractTextRequest>,
) -> ActixResult<HttpResponse> {
    EXTRACTION_SERVICE
        .extract_text(&req, extract_data.into_inner())
        .await
}

// 配置路由
pub fn configure_extraction_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/v1/extract-text")
            .route(web::post().to(extract_text))
            .wrap(RateLimit::extraction()),
    );
}
