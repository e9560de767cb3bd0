pub mod create;
pub mod evaluate;
pub mod evaluation;
pub mod get;
pub mod graded;
pub mod list;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::evaluations::requests::{CurrentEvaluationQuery, EvaluateSubmissionRequest};
use crate::models::submissions::requests::SubmissionListQuery;
use crate::storage::Storage;

pub struct SubmissionService {
    storage: Option<Arc<dyn Storage>>,
}

impl SubmissionService {
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

    // 提交作业（multipart）
    pub async fn create_submission(
        &self,
        request: &HttpRequest,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        create::create_submission(self, request, payload).await
    }

    pub async fn list_submissions(
        &self,
        request: &HttpRequest,
        query: SubmissionListQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_submissions(self, request, query).await
    }

    pub async fn get_submission(
        &self,
        request: &HttpRequest,
        submission_id: String,
    ) -> ActixResult<HttpResponse> {
        get::get_submission(self, request, submission_id).await
    }

    // 触发 AI 评测
    pub async fn evaluate_submission(
        &self,
        request: &HttpRequest,
        submission_id: String,
        body: Option<EvaluateSubmissionRequest>,
    ) -> ActixResult<HttpResponse> {
        evaluate::evaluate_submission(self, request, submission_id, body).await
    }

    pub async fn mark_graded(
        &self,
        request: &HttpRequest,
        submission_id: String,
    ) -> ActixResult<HttpResponse> {
        graded::mark_graded(self, request, submission_id).await
    }

    // 当前评测（教师/学生视角）
    pub async fn current_evaluation(
        &self,
        request: &HttpRequest,
        submission_id: String,
        query: CurrentEvaluationQuery,
    ) -> ActixResult<HttpResponse> {
        evaluation::current_evaluation(self, request, submission_id, query).await
    }
}
