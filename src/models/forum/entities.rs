use serde::{Deserialize, Serialize};
use ts_rs::TS;

crate::define_string_enum! {
    #[ts(export, export_to = "../frontend/src/types/generated/forum.ts")]
    pub enum ThreadKind {
        Discussion => "discussion",
        Question => "question",
        Announcement => "announcement",
    }
}

crate::define_string_enum! {
    // 关闭的主题不再接受回复
    #[ts(export, export_to = "../frontend/src/types/generated/forum.ts")]
    pub enum ThreadStatus {
        Open => "open",
        Closed => "closed",
    }
}

// 论坛主题
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/forum.ts")]
pub struct ForumThread {
    pub id: i64,
    pub course_id: i64,
    pub user_id: i64,
    pub title: String,
    pub content: String,
    pub kind: ThreadKind,
    pub status: ThreadStatus,
    pub pinned: bool,
    pub views: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 主题下的回复
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/forum.ts")]
pub struct ForumMessage {
    pub id: i64,
    pub thread_id: i64,
    pub user_id: i64,
    pub parent_id: Option<i64>,
    pub content: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
