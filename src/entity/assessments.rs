//! 考核项实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "assessments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_id: i64,
    pub kind: String,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Double")]
    pub weight: f64,
    pub due_date: Option<i64>,
    pub available_from: Option<i64>,
    pub available_to: Option<i64>,
    pub status: String,
    pub max_attempts: i32,
    #[sea_orm(column_type = "Double", nullable)]
    pub passing_score: Option<f64>,
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
    #[sea_orm(has_many = "super::submissions::Entity")]
    Submissions,
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_assessment(self) -> crate::models::assessments::entities::Assessment {
        use crate::models::assessments::entities::{Assessment, AssessmentKind, PublishStatus};
        use chrono::{DateTime, Utc};

        let ts = |ts: i64| DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default();

        Assessment {
            id: self.id,
            course_id: self.course_id,
            kind: self
                .kind
                .parse::<AssessmentKind>()
                .unwrap_or(AssessmentKind::Assignment),
            title: self.title,
            description: self.description,
            weight: self.weight,
            due_date: self.due_date.map(ts),
            available_from: self.available_from.map(ts),
            available_to: self.available_to.map(ts),
            status: self
                .status
                .parse::<PublishStatus>()
                .unwrap_or(PublishStatus::Draft),
            max_attempts: self.max_attempts,
            passing_score: self.passing_score,
            created_by: self.created_by,
            created_at: ts(self.created_at),
            updated_at: ts(self.updated_at),
        }
    }
}
