//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod assessments;
mod assignments;
mod evaluations;
mod submissions;

use crate::config::{AppConfig, DatabaseConfig};
use crate::errors::{EvalHubError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        Self::connect(&config.database).await
    }

    /// 按数据库配置连接并执行迁移
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let db_url = Self::build_database_url(&config.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        Self::migrate(db, &db_url).await
    }

    /// 单连接内存 SQLite，测试使用
    pub async fn in_memory() -> Result<Self> {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);

        let db = Database::connect(opt)
            .await
            .map_err(|e| EvalHubError::database_connection(format!("内存数据库连接失败: {e}")))?;

        Self::migrate(db, "sqlite::memory:").await
    }

    async fn migrate(db: DatabaseConnection, db_url: &str) -> Result<Self> {
        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| EvalHubError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| EvalHubError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| EvalHubError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.pool_size)
            .min_connections(2)
            .connect_timeout(Duration::from_secs(config.timeout))
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| EvalHubError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(EvalHubError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
use crate::models::{
    assessments::{
        entities::AssessmentTemplate,
        requests::PublishAssessmentRequest,
        responses::{PublishAssessmentResponse, TemplateDetailResponse},
    },
    assignments::{
        entities::Assignment,
        requests::CreateAssignmentRequest,
        responses::{AssignmentListResponse, AssignmentStatsResponse},
    },
    evaluations::{
        entities::{Evaluation, NewEvaluation},
        requests::EvaluationListQuery,
        responses::EvaluationListResponse,
    },
    submissions::{
        entities::{Submission, SubmissionStatus},
        requests::{NewSubmission, SubmissionListQuery},
        responses::SubmissionListResponse,
    },
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 作业模块
    async fn create_assignment(&self, req: CreateAssignmentRequest) -> Result<Assignment> {
        self.create_assignment_impl(req).await
    }

    async fn get_assignment_by_id(&self, id: &str) -> Result<Option<Assignment>> {
        self.get_assignment_by_id_impl(id).await
    }

    async fn list_assignments(&self) -> Result<AssignmentListResponse> {
        self.list_assignments_impl().await
    }

    async fn get_assignment_stats(&self, id: &str) -> Result<AssignmentStatsResponse> {
        self.get_assignment_stats_impl(id).await
    }

    // 提交模块
    async fn create_submission(&self, submission: NewSubmission) -> Result<Submission> {
        self.create_submission_impl(submission).await
    }

    async fn get_submission_by_id(&self, id: &str) -> Result<Option<Submission>> {
        self.get_submission_by_id_impl(id).await
    }

    async fn list_submissions(&self, query: SubmissionListQuery) -> Result<SubmissionListResponse> {
        self.list_submissions_impl(query).await
    }

    async fn transition_submission_status(
        &self,
        id: &str,
        from: &[SubmissionStatus],
        to: SubmissionStatus,
    ) -> Result<bool> {
        self.transition_submission_status_impl(id, from, to).await
    }

    // 评测模块
    async fn create_manual_evaluation(&self, evaluation: NewEvaluation) -> Result<Evaluation> {
        self.create_manual_evaluation_impl(evaluation).await
    }

    async fn record_ai_evaluation(&self, evaluation: NewEvaluation) -> Result<Evaluation> {
        self.record_ai_evaluation_impl(evaluation).await
    }

    async fn get_evaluation_by_id(&self, id: &str) -> Result<Option<Evaluation>> {
        self.get_evaluation_by_id_impl(id).await
    }

    async fn list_evaluations(&self, query: EvaluationListQuery) -> Result<EvaluationListResponse> {
        self.list_evaluations_impl(query).await
    }

    async fn publish_evaluation(&self, id: &str) -> Result<Option<Evaluation>> {
        self.publish_evaluation_impl(id).await
    }

    // 测评模板模块
    async fn publish_assessment(
        &self,
        req: PublishAssessmentRequest,
    ) -> Result<PublishAssessmentResponse> {
        self.publish_assessment_impl(req).await
    }

    async fn get_template_with_questions(
        &self,
        id: &str,
    ) -> Result<Option<TemplateDetailResponse>> {
        self.get_template_with_questions_impl(id).await
    }

    async fn list_templates(&self) -> Result<Vec<AssessmentTemplate>> {
        self.list_templates_impl().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assessments::entities::{GeneratedAssessment, GeneratedQuestion, QuestionType};
    use crate::models::evaluations::entities::EvaluationType;

    async fn storage_with_submission() -> (SeaOrmStorage, Assignment, Submission) {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let assignment = storage
            .create_assignment_impl(CreateAssignmentRequest {
                title: "Essay".to_string(),
                description: None,
                max_score: Some(50),
                total_marks: None,
                template_id: None,
                created_by: Some("faculty-1".to_string()),
            })
            .await
            .unwrap();
        let submission = storage
            .create_submission_impl(NewSubmission {
                assignment_id: assignment.id.clone(),
                student_id: "student-1".to_string(),
                student_name: "Ana".to_string(),
                file_path: "http://localhost/storage/assignment-files/a.txt".to_string(),
                file_name: "a.txt".to_string(),
                file_type: "text/plain".to_string(),
            })
            .await
            .unwrap();
        (storage, assignment, submission)
    }

    fn manual(submission_id: &str, score: i32) -> NewEvaluation {
        NewEvaluation {
            submission_id: submission_id.to_string(),
            score,
            max_score: 50,
            evaluation_type: EvaluationType::Manual,
            ai_feedback: None,
            manual_remarks: Some("ok".to_string()),
            evaluator_id: Some("faculty-1".to_string()),
        }
    }

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("evalhub.db").unwrap(),
            "sqlite://evalhub.db?mode=rwc"
        );
        assert!(SeaOrmStorage::build_database_url("postgres://u@h/db").is_ok());
        assert!(SeaOrmStorage::build_database_url("redis://h").is_err());
    }

    #[tokio::test]
    async fn test_conditional_transition_only_once() {
        let (storage, _, submission) = storage_with_submission().await;
        assert_eq!(submission.status, SubmissionStatus::Submitted);

        let from = SubmissionStatus::evaluable_states();
        assert!(
            storage
                .transition_submission_status_impl(&submission.id, from, SubmissionStatus::Evaluating)
                .await
                .unwrap()
        );
        // 第二次调用时状态已不在允许集合中
        assert!(
            !storage
                .transition_submission_status_impl(&submission.id, from, SubmissionStatus::Evaluating)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_record_ai_evaluation_requires_evaluating() {
        let (storage, _, submission) = storage_with_submission().await;
        let mut eval = manual(&submission.id, 40);
        eval.evaluation_type = EvaluationType::Ai;

        let err = storage
            .record_ai_evaluation_impl(eval.clone())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E020");
        // 回滚后没有残留评测
        let list = storage
            .list_evaluations_impl(EvaluationListQuery {
                submission_id: Some(submission.id.clone()),
                published_only: None,
            })
            .await
            .unwrap();
        assert!(list.items.is_empty());

        storage
            .transition_submission_status_impl(
                &submission.id,
                &[SubmissionStatus::Submitted],
                SubmissionStatus::Evaluating,
            )
            .await
            .unwrap();
        let saved = storage.record_ai_evaluation_impl(eval).await.unwrap();
        let reloaded = storage
            .get_submission_by_id_impl(&submission.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reloaded.status, SubmissionStatus::Graded);
        assert_eq!(reloaded.current_evaluation_id, Some(saved.id));
    }

    #[tokio::test]
    async fn test_evaluations_newest_first_and_publish_idempotent() {
        let (storage, _, submission) = storage_with_submission().await;
        let first = storage
            .create_manual_evaluation_impl(manual(&submission.id, 10))
            .await
            .unwrap();
        let second = storage
            .create_manual_evaluation_impl(manual(&submission.id, 20))
            .await
            .unwrap();
        assert!(second.created_at > first.created_at);

        let list = storage
            .list_evaluations_impl(EvaluationListQuery::default())
            .await
            .unwrap();
        assert_eq!(list.items[0].id, second.id);

        let once = storage.publish_evaluation_impl(&first.id).await.unwrap().unwrap();
        let twice = storage.publish_evaluation_impl(&first.id).await.unwrap().unwrap();
        assert!(once.is_published);
        assert_eq!(once, twice);
        assert!(storage.publish_evaluation_impl("missing").await.unwrap().is_none());

        let reloaded = storage
            .get_submission_by_id_impl(&submission.id)
            .await
            .unwrap()
            .unwrap();
        // 人工评分不改变状态
        assert_eq!(reloaded.status, SubmissionStatus::Submitted);
        assert_eq!(reloaded.current_evaluation_id, Some(second.id));
    }

    #[tokio::test]
    async fn test_assignment_stats() {
        let (storage, assignment, submission) = storage_with_submission().await;
        storage
            .transition_submission_status_impl(
                &submission.id,
                &[SubmissionStatus::Submitted],
                SubmissionStatus::Graded,
            )
            .await
            .unwrap();
        storage
            .create_submission_impl(NewSubmission {
                assignment_id: assignment.id.clone(),
                student_id: "student-2".to_string(),
                student_name: "Ben".to_string(),
                file_path: "http://localhost/storage/assignment-files/b.txt".to_string(),
                file_name: "b.txt".to_string(),
                file_type: "text/plain".to_string(),
            })
            .await
            .unwrap();

        let stats = storage.get_assignment_stats_impl(&assignment.id).await.unwrap();
        assert_eq!(stats.total_submissions, 2);
        assert_eq!(stats.graded, 1);
        assert_eq!(stats.ungraded, 1);
    }

    #[tokio::test]
    async fn test_publish_assessment_creates_assignment() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let req = PublishAssessmentRequest {
            assessment: GeneratedAssessment {
                title: "Rust basics".to_string(),
                description: "Ownership".to_string(),
                questions: vec![question("second", 15, 2), question("first", 5, 1)],
                total_marks: 999,
                estimated_duration: "30 minutes".to_string(),
                learning_objectives: vec![],
                is_fallback: false,
            },
            topic: Some("Rust".to_string()),
            difficulty_level: None,
            created_by: None,
        };

        let published = storage.publish_assessment_impl(req).await.unwrap();
        assert_eq!(published.assignment.max_score, 20);
        assert_eq!(published.assignment.total_marks, Some(20));
        assert_eq!(
            published.assignment.template_id.as_deref(),
            Some(published.template.id.as_str())
        );

        let detail = storage
            .get_template_with_questions_impl(&published.template.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(detail.template.total_questions, 2);
        assert_eq!(detail.questions[0].question_text, "first");
        assert_eq!(detail.questions[1].order_index, 2);
    }

    #[tokio::test]
    async fn test_publish_assessment_rejects_zero_marks() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let req = PublishAssessmentRequest {
            assessment: GeneratedAssessment {
                title: "Empty".to_string(),
                description: String::new(),
                questions: vec![],
                total_marks: 0,
                estimated_duration: String::new(),
                learning_objectives: vec![],
                is_fallback: false,
            },
            topic: None,
            difficulty_level: None,
            created_by: None,
        };
        let err = storage.publish_assessment_impl(req).await.unwrap_err();
        assert_eq!(err.code(), "E007");
        assert!(storage.list_templates_impl().await.unwrap().is_empty());
    }

    fn question(text: &str, marks: i32, order_index: i32) -> GeneratedQuestion {
        GeneratedQuestion {
            question_text: text.to_string(),
            question_type: QuestionType::Essay,
            marks,
            order_index,
            sample_answer: None,
            difficulty: None,
        }
    }

    #[tokio::test]
    async fn test_publish_assessment_rejects_zero_mark_question() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let req = PublishAssessmentRequest {
            assessment: GeneratedAssessment {
                title: "Rust basics".to_string(),
                description: "Ownership".to_string(),
                questions: vec![question("first", 10, 1), question("second", 0, 2)],
                total_marks: 10,
                estimated_duration: "30 minutes".to_string(),
                learning_objectives: vec![],
                is_fallback: false,
            },
            topic: None,
            difficulty_level: None,
            created_by: None,
        };
        let err = storage.publish_assessment_impl(req).await.unwrap_err();
        assert_eq!(err.code(), "E007");
        assert!(storage.list_templates_impl().await.unwrap().is_empty());
    }
}
