use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::RateLimit;
use crate::models::evaluations::requests::{CurrentEvaluationQuery, EvaluateSubmissionRequest};
use crate::models::submissions::requests::SubmissionListQuery;
use crate::services::SubmissionService;

// 懒加载的全局 SUBMISSION_SERVICE 实例
static SUBMISSION_SERVICE: Lazy<SubmissionService> = Lazy::new(SubmissionService::new_lazy);

pub async fn create_submission(
    req: HttpRequest,
    payload: actix_multipart::Multipart,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE.create_submission(&req, payload).await
}

pub async fn list_submissions(
    req: HttpRequest,
    query: web::Query<SubmissionListQuery>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .list_submissions(&req, query.into_inner())
        .await
}

pub async fn get_submission(
    req: HttpRequest,
    submission_id: web::Path<String>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .get_submission(&req, submission_id.into_inner())
        .await
}

// 请求体可省略
pub async fn evaluate_submission(
    req: HttpRequest,
    submission_id: web::Path<String>,
    body: Option<web::Json<EvaluateSubmissionRequest>>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .evaluate_submission(&req, submission_id.into_inner(), body.map(|b| b.into_inner()))
        .await
}

pub async fn mark_graded(
    req: HttpRequest,
    submission_id: web::Path<String>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .mark_graded(&req, submission_id.into_inner())
        .await
}

pub async fn current_evaluation(
    req: HttpRequest,
    submission_id: web::Path<String>,
    query: web::Query<CurrentEvaluationQuery>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .current_evaluation(&req, submission_id.into_inner(), query.into_inner())
        .await
}

// 配置路由
pub fn configure_submissions_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/submissions")
            .service(
                web::resource("")
                    .route(web::get().to(list_submissions))
                    .route(
                        web::post()
                            .to(create_submission)
                            .wrap(RateLimit::file_upload()),
                    ),
            )
            .service(web::resource("/{id}").route(web::get().to(get_submission)))
            .service(
                web::resource("/{id}/evaluate")
                    .route(web::post().to(evaluate_submission))
                    .wrap(RateLimit::ai_evaluation()),
            )
            .service(web::resource("/{id}/graded").route(web::post().to(mark_graded)))
            .service(
                web::resource("/{id}/evaluation").route(web::get().to(current_evaluation)),
            ),
    );
}
