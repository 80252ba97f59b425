use serde::{Deserialize, Serialize};
use ts_rs::TS;

crate::define_string_enum! {
    #[ts(export, export_to = "../frontend/src/types/generated/assessment.ts")]
    pub enum AssessmentKind {
        Assignment => "assignment",
        Quiz => "quiz",
        Project => "project",
        Midterm => "midterm",
        Final => "final",
    }
}

crate::define_string_enum! {
    // 发布状态，作业与考试共用
    #[ts(export, export_to = "../frontend/src/types/generated/assessment.ts")]
    pub enum PublishStatus {
        Draft => "draft",
        Published => "published",
        Closed => "closed",
    }
}

// 考核项（作业、测验、项目等）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assessment.ts")]
pub struct Assessment {
    pub id: i64,
    pub course_id: i64,
    pub kind: AssessmentKind,
    pub title: String,
    pub description: Option<String>,
    /// 在总评中的权重，0-100
    pub weight: f64,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
    pub available_from: Option<chrono::DateTime<chrono::Utc>>,
    pub available_to: Option<chrono::DateTime<chrono::Utc>>,
    pub status: PublishStatus,
    /// 0 表示不限次数
    pub max_attempts: i32,
    pub passing_score: Option<f64>,
    pub created_by: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Assessment {
    /// 已发布且处于开放时间内
    pub fn is_open_at(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        if self.status != PublishStatus::Published {
            return false;
        }
        if let Some(from) = self.available_from
            && now < from
        {
            return false;
        }
        if let Some(to) = self.available_to
            && now > to
        {
            return false;
        }
        true
    }

    pub fn is_late_at(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        self.due_date.is_some_and(|due| now > due)
    }

    pub fn attempts_exhausted(&self, used: i64) -> bool {
        self.max_attempts > 0 && used >= i64::from(self.max_attempts)
    }
}

// 提交记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assessment.ts")]
pub struct Submission {
    pub id: i64,
    pub assessment_id: i64,
    pub user_id: i64,
    pub attempt_number: i32,
    pub content: String,
    pub is_late: bool,
    pub score: Option<f64>,
    pub feedback: Option<String>,
    pub graded_by: Option<i64>,
    pub graded_at: Option<chrono::DateTime<chrono::Utc>>,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn assessment() -> Assessment {
        let now = Utc::now();
        Assessment {
            id: 1,
            course_id: 1,
            kind: AssessmentKind::Assignment,
            title: "Lab 1".into(),
            description: None,
            weight: 20.0,
            due_date: Some(now + Duration::days(1)),
            available_from: Some(now - Duration::days(1)),
            available_to: Some(now + Duration::days(2)),
            status: PublishStatus::Published,
            max_attempts: 2,
            passing_score: None,
            created_by: 1,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_open_window() {
        let a = assessment();
        let now = Utc::now();
        assert!(a.is_open_at(now));
        assert!(!a.is_open_at(now - Duration::days(2)));
        assert!(!a.is_open_at(now + Duration::days(3)));

        let draft = Assessment {
            status: PublishStatus::Draft,
            ..a
        };
        assert!(!draft.is_open_at(now));
    }

    #[test]
    fn test_late_and_attempt_limit() {
        let a = assessment();
        let now = Utc::now();
        assert!(!a.is_late_at(now));
        assert!(a.is_late_at(now + Duration::days(1) + Duration::seconds(5)));
        assert!(!a.attempts_exhausted(1));
        assert!(a.attempts_exhausted(2));

        let unlimited = Assessment {
            max_attempts: 0,
            ..a
        };
        assert!(!unlimited.attempts_exhausted(100));
    }
}
