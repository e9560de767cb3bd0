use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::RateLimit;
use crate::services::FileService;

// 懒加载的全局 FileService 实例
static FILE_SERVICE: Lazy<FileService> = Lazy::new(FileService::new_lazy);

pub async fn upload_signature(
    request: HttpRequest,
    payload: actix_multipart::Multipart,
) -> ActixResult<HttpResponse> {
    FILE_SERVICE.upload_signature(&request, payload).await
}

pub async fn serve_blob(
    request: HttpRequest,
    path: web::Path<(String, String)>,
) -> ActixResult<HttpResponse> {
    let (bucket, object_path) = path.into_inner();
    FILE_SERVICE.serve_blob(&request, bucket, object_path).await
}

// 配置路由
pub fn configure_file_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/v1/signatures")
            .route(web::post().to(upload_signature))
            .wrap(RateLimit::file_upload()),
    )
    .service(web::resource("/storage/{bucket}/{path:.*}").route(web::get().to(serve_blob)));
}
