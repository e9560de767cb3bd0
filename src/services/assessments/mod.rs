pub mod generate;
pub mod publish;
pub mod templates;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::assessments::requests::{GenerateAssessmentRequest, PublishAssessmentRequest};
use crate::storage::Storage;

pub struct AssessmentService {
    storage: Option<Arc<dyn Storage>>,
}

impl AssessmentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 调用模型生成测评草稿
    pub async fn generate_assessment(
        &self,
        request: &HttpRequest,
        req: GenerateAssessmentRequest,
    ) -> ActixResult<HttpResponse> {
        generate::generate_assessment(self, request, req).await
    }

    // 发布测评：保存模板与题目并生成作业
    pub async fn publish_assessment(
        &self,
        request: &HttpRequest,
        req: PublishAssessmentRequest,
    ) -> ActixResult<HttpResponse> {
        publish::publish_assessment(self, request, req).await
    }

    pub async fn list_templates(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        templates::list_templates(self, request).await
    }

    pub async fn get_template(
        &self,
        request: &HttpRequest,
        template_id: String,
    ) -> ActixResult<HttpResponse> {
        templates::get_template(self, request, template_id).await
    }
}
