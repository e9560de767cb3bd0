//! 测评模板实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "assessment_templates")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub topic: String,
    pub difficulty_level: String,
    pub total_questions: i32,
    pub is_published: bool,
    pub created_by: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::questions::Entity")]
    Questions,
}

impl Related<super::questions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Questions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_template(self) -> crate::models::assessments::entities::AssessmentTemplate {
        use crate::models::assessments::entities::{AssessmentTemplate, DifficultyLevel};
        use chrono::{DateTime, Utc};

        AssessmentTemplate {
            id: self.id,
            title: self.title,
            description: self.description,
            topic: self.topic,
            difficulty_level: self
                .difficulty_level
                .parse::<DifficultyLevel>()
                .unwrap_or_default(),
            total_questions: self.total_questions,
            is_published: self.is_published,
            created_by: self.created_by,
            created_at: DateTime::<Utc>::from_timestamp_millis(self.created_at).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp_millis(self.updated_at).unwrap_or_default(),
        }
    }
}
