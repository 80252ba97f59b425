use serde::Deserialize;
use ts_rs::TS;

use super::entities::EventKind;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/schedule.ts")]
pub struct CreateEventRequest {
    pub course_id: Option<i64>,
    pub kind: Option<EventKind>,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: chrono::DateTime<chrono::Utc>,
    pub ends_at: chrono::DateTime<chrono::Utc>,
}

impl CreateEventRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.title.trim().is_empty() {
            return Err("Event title must not be empty");
        }
        if self.ends_at < self.starts_at {
            return Err("Event must not end before it starts");
        }
        Ok(())
    }

    /// 未指定类型时，课程事件默认为 event，个人事件默认为 personal
    pub fn resolved_kind(&self) -> EventKind {
        self.kind.unwrap_or(if self.course_id.is_some() {
            EventKind::Event
        } else {
            EventKind::Personal
        })
    }
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/schedule.ts")]
pub struct UpdateEventRequest {
    pub kind: Option<EventKind>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: Option<chrono::DateTime<chrono::Utc>>,
    pub ends_at: Option<chrono::DateTime<chrono::Utc>>,
}

// 日程查询区间，缺省为当前时间前后 30 天
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/schedule.ts")]
pub struct ScheduleQuery {
    pub from: Option<chrono::DateTime<chrono::Utc>>,
    pub to: Option<chrono::DateTime<chrono::Utc>>,
}

pub const DEFAULT_SCHEDULE_WINDOW_DAYS: i64 = 30;

impl ScheduleQuery {
    pub fn resolve(
        &self,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<(chrono::DateTime<chrono::Utc>, chrono::DateTime<chrono::Utc>), &'static str> {
        let window = chrono::Duration::days(DEFAULT_SCHEDULE_WINDOW_DAYS);
        let from = self.from.unwrap_or(now - window);
        let to = self.to.unwrap_or(now + window);
        if to < from {
            return Err("'to' must not be before 'from'");
        }
        Ok((from, to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn test_resolved_kind() {
        let now = Utc::now();
        let mut req = CreateEventRequest {
            course_id: None,
            kind: None,
            title: "Dentist".into(),
            description: None,
            location: None,
            starts_at: now,
            ends_at: now + Duration::hours(1),
        };
        assert_eq!(req.resolved_kind(), EventKind::Personal);
        req.course_id = Some(1);
        assert_eq!(req.resolved_kind(), EventKind::Event);
        req.kind = Some(EventKind::Exam);
        assert_eq!(req.resolved_kind(), EventKind::Exam);
    }

    #[test]
    fn test_schedule_query_defaults() {
        let now = Utc::now();
        let (from, to) = ScheduleQuery::default().resolve(now).unwrap();
        assert_eq!(to - from, Duration::days(60));

        let inverted = ScheduleQuery {
            from: Some(now),
            to: Some(now - Duration::days(1)),
        };
        assert!(inverted.resolve(now).is_err());
    }
}
