//! 考试实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "exams")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub available_from: Option<i64>,
    pub available_to: Option<i64>,
    pub max_attempts: i32,
    #[sea_orm(column_type = "Double", nullable)]
    pub passing_score: Option<f64>,
    pub status: String,
    pub created_by: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id",
        on_delete = "Cascade"
    )]
    Course,
    #[sea_orm(has_many = "super::exam_questions::Entity")]
    Questions,
    #[sea_orm(has_many = "super::exam_attempts::Entity")]
    Attempts,
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::exam_questions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Questions.def()
    }
}

impl Related<super::exam_attempts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attempts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_exam(self) -> crate::models::exams::entities::Exam {
        use crate::models::assessments::entities::PublishStatus;
        use crate::models::exams::entities::Exam;
        use chrono::{DateTime, Utc};

        let ts = |ts: i64| DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default();

        Exam {
            id: self.id,
            course_id: self.course_id,
            title: self.title,
            description: self.description,
            duration_minutes: self.duration_minutes,
            available_from: self.available_from.map(ts),
            available_to: self.available_to.map(ts),
            max_attempts: self.max_attempts,
            passing_score: self.passing_score,
            status: self
                .status
                .parse::<PublishStatus>()
                .unwrap_or(PublishStatus::Draft),
            created_by: self.created_by,
            created_at: ts(self.created_at),
            updated_at: ts(self.updated_at),
        }
    }
}
