//! 题目实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "questions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub assessment_template_id: String,
    #[sea_orm(column_type = "Text")]
    pub question_text: String,
    pub question_type: String,
    pub marks: i32,
    pub order_index: i32,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assessment_templates::Entity",
        from = "Column::AssessmentTemplateId",
        to = "super::assessment_templates::Column::Id"
    )]
    Template,
}

impl Related<super::assessment_templates::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Template.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_question(self) -> crate::models::assessments::entities::Question {
        use crate::models::assessments::entities::{Question, QuestionType};
        use chrono::{DateTime, Utc};

        Question {
            id: self.id,
            assessment_template_id: self.assessment_template_id,
            question_text: self.question_text,
            question_type: self
                .question_type
                .parse::<QuestionType>()
                .unwrap_or(QuestionType::Essay),
            marks: self.marks,
            order_index: self.order_index,
            created_at: DateTime::<Utc>::from_timestamp_millis(self.created_at).unwrap_or_default(),
        }
    }
}
