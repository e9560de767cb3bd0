pub mod serve;
pub mod signature;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

pub struct FileService;

impl FileService {
    pub fn new_lazy() -> Self {
        Self
    }

    // 上传教师签名图片
    pub async fn upload_signature(
        &self,
        request: &HttpRequest,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        signature::upload_signature(self, request, payload).await
    }

    // 读取对象存储中的文件
    pub async fn serve_blob(
        &self,
        request: &HttpRequest,
        bucket: String,
        path: String,
    ) -> ActixResult<HttpResponse> {
        serve::serve_blob(self, request, bucket, path).await
    }
}
