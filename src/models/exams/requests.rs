use serde::Deserialize;
use ts_rs::TS;

use crate::models::assessments::entities::PublishStatus;
use crate::models::assessments::requests::{validate_percentage, validate_window};

// 创建考试请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct CreateExamRequest {
    pub title: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub available_from: Option<chrono::DateTime<chrono::Utc>>,
    pub available_to: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: i32,
    pub passing_score: Option<f64>,
    pub status: Option<PublishStatus>,
}

fn default_max_attempts() -> i32 {
    1
}

impl CreateExamRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.title.trim().is_empty() {
            return Err("Exam title must not be empty");
        }
        if self.duration_minutes <= 0 {
            return Err("duration_minutes must be positive");
        }
        if self.max_attempts < 1 {
            return Err("max_attempts must be at least 1");
        }
        if let Some(passing) = self.passing_score {
            validate_percentage(passing, "Passing score must be between 0 and 100")?;
        }
        validate_window(self.available_from, self.available_to)
    }
}

// 更新考试请求
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct UpdateExamRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration_minutes: Option<i32>,
    pub available_from: Option<chrono::DateTime<chrono::Utc>>,
    pub available_to: Option<chrono::DateTime<chrono::Utc>>,
    pub max_attempts: Option<i32>,
    pub passing_score: Option<f64>,
    pub status: Option<PublishStatus>,
}

impl UpdateExamRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(title) = &self.title
            && title.trim().is_empty()
        {
            return Err("Exam title must not be empty");
        }
        if self.duration_minutes.is_some_and(|d| d <= 0) {
            return Err("duration_minutes must be positive");
        }
        if self.max_attempts.is_some_and(|m| m < 1) {
            return Err("max_attempts must be at least 1");
        }
        if let Some(passing) = self.passing_score {
            validate_percentage(passing, "Passing score must be between 0 and 100")?;
        }
        validate_window(self.available_from, self.available_to)
    }
}

// 创建试题请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct CreateQuestionRequest {
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    pub correct_answer: String,
    pub points: f64,
    #[serde(default)]
    pub position: i32,
}

impl CreateQuestionRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.question.trim().is_empty() {
            return Err("Question text must not be empty");
        }
        if self.correct_answer.trim().is_empty() {
            return Err("Correct answer must not be empty");
        }
        if !self.points.is_finite() || self.points <= 0.0 {
            return Err("Points must be positive");
        }
        Ok(())
    }
}

// 更新试题请求
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct UpdateQuestionRequest {
    pub question: Option<String>,
    pub options: Option<Vec<String>>,
    pub correct_answer: Option<String>,
    pub points: Option<f64>,
    pub position: Option<i32>,
}

impl UpdateQuestionRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(question) = &self.question
            && question.trim().is_empty()
        {
            return Err("Question text must not be empty");
        }
        if let Some(answer) = &self.correct_answer
            && answer.trim().is_empty()
        {
            return Err("Correct answer must not be empty");
        }
        if self.points.is_some_and(|p| !p.is_finite() || p <= 0.0) {
            return Err("Points must be positive");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct AnswerInput {
    pub question_id: i64,
    pub answer: String,
}

// 交卷请求
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct SubmitAttemptRequest {
    #[serde(default)]
    pub answers: Vec<AnswerInput>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_exam_defaults() {
        let req: CreateExamRequest =
            serde_json::from_str(r#"{"title": "Final", "duration_minutes": 60}"#).unwrap();
        assert_eq!(req.max_attempts, 1);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_exam_rejects_zero_duration() {
        let req: CreateExamRequest =
            serde_json::from_str(r#"{"title": "Final", "duration_minutes": 0}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_question_points_positive() {
        let req = CreateQuestionRequest {
            question: "2 + 2?".into(),
            options: vec!["3".into(), "4".into()],
            correct_answer: "4".into(),
            points: 0.0,
            position: 1,
        };
        assert_eq!(req.validate(), Err("Points must be positive"));
    }
}
