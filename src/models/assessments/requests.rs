use serde::Deserialize;
use ts_rs::TS;

use super::entities::{AssessmentKind, PublishStatus};
use crate::models::common::PaginationQuery;

pub(crate) fn validate_percentage(value: f64, message: &'static str) -> Result<(), &'static str> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(message);
    }
    Ok(())
}

pub(crate) fn validate_window(
    from: Option<chrono::DateTime<chrono::Utc>>,
    to: Option<chrono::DateTime<chrono::Utc>>,
) -> Result<(), &'static str> {
    if let (Some(from), Some(to)) = (from, to)
        && to < from
    {
        return Err("available_to must not be before available_from");
    }
    Ok(())
}

// 创建考核项请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assessment.ts")]
pub struct CreateAssessmentRequest {
    pub kind: AssessmentKind,
    pub title: String,
    pub description: Option<String>,
    pub weight: f64,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
    pub available_from: Option<chrono::DateTime<chrono::Utc>>,
    pub available_to: Option<chrono::DateTime<chrono::Utc>>,
    pub status: Option<PublishStatus>,
    #[serde(default)]
    pub max_attempts: i32,
    pub passing_score: Option<f64>,
}

impl CreateAssessmentRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.title.trim().is_empty() {
            return Err("Assessment title must not be empty");
        }
        validate_percentage(self.weight, "Weight must be between 0 and 100")?;
        if let Some(passing) = self.passing_score {
            validate_percentage(passing, "Passing score must be between 0 and 100")?;
        }
        if self.max_attempts < 0 {
            return Err("max_attempts must not be negative");
        }
        validate_window(self.available_from, self.available_to)
    }
}

// 更新考核项请求
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assessment.ts")]
pub struct UpdateAssessmentRequest {
    pub kind: Option<AssessmentKind>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub weight: Option<f64>,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
    pub available_from: Option<chrono::DateTime<chrono::Utc>>,
    pub available_to: Option<chrono::DateTime<chrono::Utc>>,
    pub status: Option<PublishStatus>,
    pub max_attempts: Option<i32>,
    pub passing_score: Option<f64>,
}

impl UpdateAssessmentRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(title) = &self.title
            && title.trim().is_empty()
        {
            return Err("Assessment title must not be empty");
        }
        if let Some(weight) = self.weight {
            validate_percentage(weight, "Weight must be between 0 and 100")?;
        }
        if let Some(passing) = self.passing_score {
            validate_percentage(passing, "Passing score must be between 0 and 100")?;
        }
        if self.max_attempts.is_some_and(|m| m < 0) {
            return Err("max_attempts must not be negative");
        }
        validate_window(self.available_from, self.available_to)
    }
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assessment.ts")]
pub struct AssessmentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<PublishStatus>,
}

// 考核项列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct AssessmentListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub status: Option<PublishStatus>,
}

impl From<AssessmentListParams> for AssessmentListQuery {
    fn from(params: AssessmentListParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            status: params.status,
        }
    }
}

// 学生提交请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assessment.ts")]
pub struct SubmitAssessmentRequest {
    pub content: String,
}

// 评分请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assessment.ts")]
pub struct GradeSubmissionRequest {
    pub score: f64,
    pub feedback: Option<String>,
}

impl GradeSubmissionRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        validate_percentage(self.score, "Score must be between 0 and 100")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_assessment_validation() {
        let mut req: CreateAssessmentRequest = serde_json::from_str(
            r#"{"kind": "quiz", "title": "Quiz 1", "weight": 10}"#,
        )
        .unwrap();
        assert_eq!(req.max_attempts, 0);
        assert!(req.validate().is_ok());

        req.weight = 120.0;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_grade_range() {
        assert!(GradeSubmissionRequest { score: 100.0, feedback: None }.validate().is_ok());
        assert!(GradeSubmissionRequest { score: -1.0, feedback: None }.validate().is_err());
        assert!(GradeSubmissionRequest { score: f64::NAN, feedback: None }.validate().is_err());
    }

    #[test]
    fn test_window_order() {
        let req = UpdateAssessmentRequest {
            available_from: Some(chrono::Utc::now()),
            available_to: Some(chrono::Utc::now() - chrono::Duration::hours(1)),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }
}
