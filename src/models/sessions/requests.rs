use serde::Deserialize;
use ts_rs::TS;

use super::entities::{AttendanceStatus, DeliveryMode};

// 创建课次请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/session.ts")]
pub struct CreateSessionRequest {
    pub number: i32,
    pub title: String,
    pub description: Option<String>,
    pub starts_at: chrono::DateTime<chrono::Utc>,
    pub ends_at: chrono::DateTime<chrono::Utc>,
    pub delivery_mode: DeliveryMode,
    pub location: Option<String>,
    pub meeting_link: Option<String>,
}

impl CreateSessionRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.number < 1 {
            return Err("Session number must be positive");
        }
        if self.title.trim().is_empty() {
            return Err("Session title must not be empty");
        }
        if self.ends_at < self.starts_at {
            return Err("Session must not end before it starts");
        }
        Ok(())
    }
}

// 更新课次请求
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/session.ts")]
pub struct UpdateSessionRequest {
    pub number: Option<i32>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub starts_at: Option<chrono::DateTime<chrono::Utc>>,
    pub ends_at: Option<chrono::DateTime<chrono::Utc>>,
    pub delivery_mode: Option<DeliveryMode>,
    pub location: Option<String>,
    pub meeting_link: Option<String>,
}

// 教师标记考勤
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/session.ts")]
pub struct MarkAttendanceRequest {
    pub user_id: i64,
    pub status: AttendanceStatus,
    pub comment: Option<String>,
}

// 学生自助签到
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/session.ts")]
pub struct CheckInRequest {
    pub comment: Option<String>,
}

// 考勤写入参数（用于存储层），按 (session_id, user_id) 覆盖写入
#[derive(Debug, Clone)]
pub struct AttendanceUpsert {
    pub session_id: i64,
    pub user_id: i64,
    pub status: AttendanceStatus,
    pub comment: Option<String>,
    pub checked_in_at: Option<chrono::DateTime<chrono::Utc>>,
    pub marked_by: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_session_validation() {
        let req: CreateSessionRequest = serde_json::from_str(
            r#"{
                "number": 1,
                "title": "Intro",
                "starts_at": "2025-03-01T10:00:00Z",
                "ends_at": "2025-03-01T09:00:00Z",
                "delivery_mode": "online"
            }"#,
        )
        .unwrap();
        assert_eq!(req.validate(), Err("Session must not end before it starts"));
    }
}
