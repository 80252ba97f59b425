//! 论坛主题实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "forum_threads")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_id: i64,
    pub user_id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub kind: String,
    pub status: String,
    pub pinned: bool,
    pub views: i64,
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
    #[sea_orm(has_many = "super::forum_messages::Entity")]
    Messages,
}

impl Related<super::forum_messages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Messages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_thread(self) -> crate::models::forum::entities::ForumThread {
        use crate::models::forum::entities::{ForumThread, ThreadKind, ThreadStatus};
        use chrono::{DateTime, Utc};

        ForumThread {
            id: self.id,
            course_id: self.course_id,
            user_id: self.user_id,
            title: self.title,
            content: self.content,
            kind: self
                .kind
                .parse::<ThreadKind>()
                .unwrap_or(ThreadKind::Discussion),
            status: self
                .status
                .parse::<ThreadStatus>()
                .unwrap_or(ThreadStatus::Closed),
            pinned: self.pinned,
            views: self.views,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
