use serde::{Deserialize, Serialize};
use ts_rs::TS;

crate::define_string_enum! {
    #[ts(export, export_to = "../frontend/src/types/generated/schedule.ts")]
    pub enum EventKind {
        Lecture => "lecture",
        Exam => "exam",
        Assignment => "assignment",
        Event => "event",
        Personal => "personal",
    }
}

// 日程事件；course_id 为空时为个人事件
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/schedule.ts")]
pub struct ScheduleEvent {
    pub id: i64,
    pub course_id: Option<i64>,
    pub owner_id: i64,
    pub kind: EventKind,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: chrono::DateTime<chrono::Utc>,
    pub ends_at: chrono::DateTime<chrono::Utc>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
