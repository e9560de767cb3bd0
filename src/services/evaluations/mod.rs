pub mod create;
pub mod list;
pub mod publish;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::evaluations::requests::{CreateManualEvaluationRequest, EvaluationListQuery};
use crate::storage::Storage;

pub struct EvaluationService {
    storage: Option<Arc<dyn Storage>>,
}

impl EvaluationService {
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

    // 人工评分
    pub async fn create_manual_evaluation(
        &self,
        request: &HttpRequest,
        req: CreateManualEvaluationRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_manual_evaluation(self, request, req).await
    }

    pub async fn list_evaluations(
        &self,
        request: &HttpRequest,
        query: EvaluationListQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_evaluations(self, request, query).await
    }

    // 发布评测（幂等）
    pub async fn publish_evaluation(
        &self,
        request: &HttpRequest,
        evaluation_id: String,
    ) -> ActixResult<HttpResponse> {
        publish::publish_evaluation(self, request, evaluation_id).await
    }
}
