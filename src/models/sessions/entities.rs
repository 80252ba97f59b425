use serde::{Deserialize, Serialize};
use ts_rs::TS;

crate::define_string_enum! {
    #[ts(export, export_to = "../frontend/src/types/generated/session.ts")]
    pub enum DeliveryMode {
        Online => "online",
        Onsite => "onsite",
        Hybrid => "hybrid",
    }
}

crate::define_string_enum! {
    // 考勤状态
    #[ts(export, export_to = "../frontend/src/types/generated/session.ts")]
    pub enum AttendanceStatus {
        Present => "present",
        Absent => "absent",
        Late => "late",
        Excused => "excused",
    }
}

/// 签到窗口：开课前 15 分钟开放
pub const CHECK_IN_OPENS_BEFORE_SECS: i64 = 15 * 60;
/// 开课 15 分钟后签到记为迟到
pub const LATE_AFTER_SECS: i64 = 15 * 60;

// 课次实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/session.ts")]
pub struct CourseSession {
    pub id: i64,
    pub course_id: i64,
    pub number: i32,
    pub title: String,
    pub description: Option<String>,
    pub starts_at: chrono::DateTime<chrono::Utc>,
    pub ends_at: chrono::DateTime<chrono::Utc>,
    pub delivery_mode: DeliveryMode,
    pub location: Option<String>,
    pub meeting_link: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl CourseSession {
    /// 判断给定时间能否自助签到，可以时返回应记录的状态
    pub fn check_in_status_at(
        &self,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Option<AttendanceStatus> {
        let opens_at = self.starts_at - chrono::Duration::seconds(CHECK_IN_OPENS_BEFORE_SECS);
        if now < opens_at || now > self.ends_at {
            return None;
        }
        if now > self.starts_at + chrono::Duration::seconds(LATE_AFTER_SECS) {
            Some(AttendanceStatus::Late)
        } else {
            Some(AttendanceStatus::Present)
        }
    }
}

// 考勤记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/session.ts")]
pub struct Attendance {
    pub id: i64,
    pub session_id: i64,
    pub user_id: i64,
    pub status: AttendanceStatus,
    pub comment: Option<String>,
    pub checked_in_at: Option<chrono::DateTime<chrono::Utc>>,
    /// 由教师标记时记录操作人
    pub marked_by: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 考勤汇总
#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/session.ts")]
pub struct AttendanceSummary {
    pub present: i64,
    pub late: i64,
    pub absent: i64,
    pub excused: i64,
    pub total: i64,
    /// 出勤率（present + late）/ total，百分比
    pub attendance_rate: f64,
}

impl AttendanceSummary {
    pub fn from_records(records: &[Attendance]) -> Self {
        let mut summary = Self::default();
        for record in records {
            match record.status {
                AttendanceStatus::Present => summary.present += 1,
                AttendanceStatus::Late => summary.late += 1,
                AttendanceStatus::Absent => summary.absent += 1,
                AttendanceStatus::Excused => summary.excused += 1,
            }
        }
        summary.total = records.len() as i64;
        if summary.total > 0 {
            let attended = (summary.present + summary.late) as f64;
            summary.attendance_rate =
                (attended / summary.total as f64 * 10000.0).round() / 100.0;
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn session() -> CourseSession {
        let starts_at = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        CourseSession {
            id: 1,
            course_id: 1,
            number: 1,
            title: "Week 1".into(),
            description: None,
            starts_at,
            ends_at: starts_at + Duration::hours(2),
            delivery_mode: DeliveryMode::Onsite,
            location: None,
            meeting_link: None,
            created_at: starts_at,
            updated_at: starts_at,
        }
    }

    fn record(status: AttendanceStatus) -> Attendance {
        let now = Utc::now();
        Attendance {
            id: 0,
            session_id: 1,
            user_id: 1,
            status,
            comment: None,
            checked_in_at: None,
            marked_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_check_in_window() {
        let s = session();
        assert_eq!(s.check_in_status_at(s.starts_at - Duration::minutes(16)), None);
        assert_eq!(
            s.check_in_status_at(s.starts_at - Duration::minutes(15)),
            Some(AttendanceStatus::Present)
        );
        assert_eq!(
            s.check_in_status_at(s.starts_at + Duration::minutes(15)),
            Some(AttendanceStatus::Present)
        );
        assert_eq!(
            s.check_in_status_at(s.starts_at + Duration::minutes(16)),
            Some(AttendanceStatus::Late)
        );
        assert_eq!(s.check_in_status_at(s.ends_at), Some(AttendanceStatus::Late));
        assert_eq!(s.check_in_status_at(s.ends_at + Duration::seconds(1)), None);
    }

    #[test]
    fn test_summary_rate() {
        let records = vec![
            record(AttendanceStatus::Present),
            record(AttendanceStatus::Late),
            record(AttendanceStatus::Absent),
        ];
        let summary = AttendanceSummary::from_records(&records);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.present, 1);
        assert_eq!(summary.late, 1);
        assert_eq!(summary.attendance_rate, 66.67);
    }

    #[test]
    fn test_summary_empty() {
        assert_eq!(AttendanceSummary::from_records(&[]), AttendanceSummary::default());
    }
}
