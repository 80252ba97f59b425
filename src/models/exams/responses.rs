use super::entities::{ExamAnswer, ExamAttempt};
use serde::Serialize;
use ts_rs::TS;

// 交卷结果
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct ExamAttemptResult {
    pub attempt: ExamAttempt,
    pub answers: Vec<ExamAnswer>,
    pub earned_points: f64,
    pub total_points: f64,
    pub passed: Option<bool>,
}
