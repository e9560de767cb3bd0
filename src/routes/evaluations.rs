use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::evaluations::requests::{CreateManualEvaluationRequest, EvaluationListQuery};
use crate::services::EvaluationService;

// 懒加载的全局 EVALUATION_SERVICE 实例
static EVALUATION_SERVICE: Lazy<EvaluationService> = Lazy::new(EvaluationService::new_lazy);

pub async fn create_manual_evaluation(
    req: HttpRequest,
    evaluation_data: web::Json<CreateManualEvaluationRequest>,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .create_manual_evaluation(&req, evaluation_data.into_inner())
        .await
}

pub async fn list_evaluations(
    req: HttpRequest,
    query: web::Query<EvaluationListQuery>,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .list_evaluations(&req, query.into_inner())
        .await
}

pub async fn publish_evaluation(
    req: HttpRequest,
    evaluation_id: web::Path<String>,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .publish_evaluation(&req, evaluation_id.into_inner())
        .await
}

// 配置路由
pub fn configure_evaluations_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/evaluations")
            .service(
                web::resource("")
                    .route(web::get().to(list_evaluations))
                    .route(web::post().to(create_manual_evaluation)),
            )
            .service(web::resource("/{id}/publish").route(web::post().to(publish_evaluation))),
    );
}
