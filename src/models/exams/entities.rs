use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::assessments::entities::PublishStatus;

crate::define_string_enum! {
    // 考试作答状态
    #[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
    pub enum AttemptStatus {
        InProgress => "in_progress",
        Submitted => "submitted",
        Expired => "expired",
    }
}

// 考试实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct Exam {
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub available_from: Option<chrono::DateTime<chrono::Utc>>,
    pub available_to: Option<chrono::DateTime<chrono::Utc>>,
    pub max_attempts: i32,
    pub passing_score: Option<f64>,
    pub status: PublishStatus,
    pub created_by: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Exam {
    pub fn is_open_at(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        self.status == PublishStatus::Published
            && self.available_from.is_none_or(|from| now >= from)
            && self.available_to.is_none_or(|to| now <= to)
    }

    /// 作答截止时间
    pub fn deadline_for(
        &self,
        started_at: chrono::DateTime<chrono::Utc>,
    ) -> chrono::DateTime<chrono::Utc> {
        started_at + chrono::Duration::minutes(i64::from(self.duration_minutes))
    }
}

// 试题；学生视图中 correct_answer 始终为空
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct ExamQuestion {
    pub id: i64,
    pub exam_id: i64,
    pub question: String,
    pub options: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub correct_answer: Option<String>,
    pub points: f64,
    pub position: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl ExamQuestion {
    pub fn without_answer(self) -> Self {
        Self {
            correct_answer: None,
            ..self
        }
    }
}

// 一次考试作答
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct ExamAttempt {
    pub id: i64,
    pub exam_id: i64,
    pub user_id: i64,
    pub attempt_number: i32,
    pub status: AttemptStatus,
    pub score: Option<f64>,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub finished_at: Option<chrono::DateTime<chrono::Utc>>,
}

// 单题作答记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct ExamAnswer {
    pub id: i64,
    pub attempt_id: i64,
    pub question_id: i64,
    pub answer: String,
    pub is_correct: bool,
    pub points_awarded: f64,
}

/// 判分结果
#[derive(Debug, Clone, PartialEq)]
pub struct GradedAnswers {
    pub answers: Vec<ExamAnswer>,
    pub earned_points: f64,
    pub total_points: f64,
}

impl GradedAnswers {
    /// 百分制得分，保留两位小数
    pub fn score(&self) -> f64 {
        if self.total_points <= 0.0 {
            return 0.0;
        }
        (self.earned_points / self.total_points * 10000.0).round() / 100.0
    }
}

fn normalize_answer(answer: &str) -> String {
    answer.trim().to_lowercase()
}

/// 自动判分：去除首尾空白后忽略大小写比较
///
/// 未作答的题目不产生记录但计入总分；重复作答同一题只取第一次，
/// 不属于本考试的题目被忽略。
pub fn grade_answers(
    questions: &[ExamQuestion],
    submitted: &[(i64, String)],
) -> GradedAnswers {
    let by_id: HashMap<i64, &ExamQuestion> = questions.iter().map(|q| (q.id, q)).collect();
    let total_points = questions.iter().map(|q| q.points).sum();

    let mut seen = std::collections::HashSet::new();
    let mut answers = Vec::new();
    let mut earned_points = 0.0;

    for (question_id, answer) in submitted {
        let Some(question) = by_id.get(question_id) else {
            continue;
        };
        if !seen.insert(*question_id) {
            continue;
        }
        let is_correct = question
            .correct_answer
            .as_deref()
            .is_some_and(|correct| normalize_answer(correct) == normalize_answer(answer));
        let points_awarded = if is_correct { question.points } else { 0.0 };
        earned_points += points_awarded;
        answers.push(ExamAnswer {
            id: 0,
            attempt_id: 0,
            question_id: *question_id,
            answer: answer.clone(),
            is_correct,
            points_awarded,
        });
    }

    GradedAnswers {
        answers,
        earned_points,
        total_points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn question(id: i64, correct: &str, points: f64) -> ExamQuestion {
        let now = Utc::now();
        ExamQuestion {
            id,
            exam_id: 1,
            question: format!("Q{id}"),
            options: vec!["A".into(), "B".into()],
            correct_answer: Some(correct.into()),
            points,
            position: id as i32,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_grade_trims_and_ignores_case() {
        let questions = vec![question(1, "Paris", 2.0), question(2, "B", 3.0)];
        let result = grade_answers(
            &questions,
            &[(1, "  paris ".into()), (2, "a".into())],
        );
        assert_eq!(result.earned_points, 2.0);
        assert_eq!(result.total_points, 5.0);
        assert_eq!(result.score(), 40.0);
        assert!(result.answers[0].is_correct);
        assert!(!result.answers[1].is_correct);
    }

    #[test]
    fn test_grade_skips_foreign_and_duplicate_answers() {
        let questions = vec![question(1, "A", 1.0)];
        let result = grade_answers(
            &questions,
            &[(1, "A".into()), (1, "B".into()), (99, "A".into())],
        );
        assert_eq!(result.answers.len(), 1);
        assert_eq!(result.score(), 100.0);
    }

    #[test]
    fn test_grade_without_questions() {
        let result = grade_answers(&[], &[]);
        assert_eq!(result.score(), 0.0);
    }

    #[test]
    fn test_student_view_hides_answer() {
        let json = serde_json::to_value(question(1, "A", 1.0).without_answer()).unwrap();
        assert!(json.get("correct_answer").is_none());
    }
}
