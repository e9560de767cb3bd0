use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::RateLimit;
use crate::models::assessments::requests::{GenerateAssessmentRequest, PublishAssessmentRequest};
use crate::services::AssessmentService;

// 懒加载的全局 ASSESSMENT_SERVICE 实例
static ASSESSMENT_SERVICE: Lazy<AssessmentService> = Lazy::new(AssessmentService::new_lazy);

pub async fn generate_assessment(
    req: HttpRequest,
    generate_data: web::Json<GenerateAssessmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSESSMENT_SERVICE
        .generate_assessment(&req, generate_data.into_inner())
        .await
}

pub async fn publish_assessment(
    req: HttpRequest,
    publish_data: web::Json<PublishAssessmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSESSMENT_SERVICE
        .publish_assessment(&req, publish_data.into_inner())
        .await
}

pub async fn list_templates(req: HttpRequest) -> ActixResult<HttpResponse> {
    ASSESSMENT_SERVICE.list_templates(&req).await
}

pub async fn get_template(
    req: HttpRequest,
    template_id: web::Path<String>,
) -> ActixResult<HttpResponse> {
    ASSESSMENT_SERVICE
        .get_template(&req, template_id.into_inner())
        .await
}

// 配置路由
pub fn configure_assessments_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/assessments")
            .service(
                web::resource("/generate")
                    .route(web::post().to(generate_assessment))
                    .wrap(RateLimit::ai_generation()),
            )
            .service(web::resource("/publish").route(web::post().to(publish_assessment)))
            .service(web::resource("/templates").route(web::get().to(list_templates)))
            .service(web::resource("/templates/{id}").route(web::get().to(get_template))),
    );
}
