//! 评测实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "evaluations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub submission_id: String,
    pub score: i32,
    pub max_score: i32,
    pub evaluation_type: String,
    /// AI 反馈，JSON 文本
    #[sea_orm(column_type = "Text", nullable)]
    pub ai_feedback: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub manual_remarks: Option<String>,
    pub evaluator_id: Option<String>,
    pub is_published: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::submissions::Entity",
        from = "Column::SubmissionId",
        to = "super::submissions::Column::Id"
    )]
    Submission,
}

impl Related<super::submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submission.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_evaluation(self) -> crate::models::evaluations::entities::Evaluation {
        use crate::models::evaluations::entities::{AiFeedback, Evaluation, EvaluationType};
        use chrono::{DateTime, Utc};

        // 反馈内容损坏时不影响评分本身的读取
        let ai_feedback = self.ai_feedback.as_deref().and_then(|raw| {
            serde_json::from_str::<AiFeedback>(raw)
                .map_err(|e| {
                    tracing::warn!("Evaluation {} has unreadable ai_feedback: {}", self.id, e)
                })
                .ok()
        });

        Evaluation {
            id: self.id,
            submission_id: self.submission_id,
            score: self.score,
            max_score: self.max_score,
            evaluation_type: self
                .evaluation_type
                .parse::<EvaluationType>()
                .unwrap_or(EvaluationType::Manual),
            ai_feedback,
            manual_remarks: self.manual_remarks,
            evaluator_id: self.evaluator_id,
            is_published: self.is_published,
            created_at: DateTime::<Utc>::from_timestamp_millis(self.created_at).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp_millis(self.updated_at).unwrap_or_default(),
        }
    }
}
