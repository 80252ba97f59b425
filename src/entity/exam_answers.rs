//! 单题作答实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "exam_answers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub attempt_id: i64,
    pub question_id: i64,
    #[sea_orm(column_type = "Text")]
    pub answer: String,
    pub is_correct: bool,
    #[sea_orm(column_type = "Double")]
    pub points_awarded: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::exam_attempts::Entity",
        from = "Column::AttemptId",
        to = "super::exam_attempts::Column::Id",
        on_delete = "Cascade"
    )]
    Attempt,
    #[sea_orm(
        belongs_to = "super::exam_questions::Entity",
        from = "Column::QuestionId",
        to = "super::exam_questions::Column::Id",
        on_delete = "Cascade"
    )]
    Question,
}

impl Related<super::exam_attempts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attempt.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_answer(self) -> crate::models::exams::entities::ExamAnswer {
        crate::models::exams::entities::ExamAnswer {
            id: self.id,
            attempt_id: self.attempt_id,
            question_id: self.question_id,
            answer: self.answer,
            is_correct: self.is_correct,
            points_awarded: self.points_awarded,
        }
    }
}
