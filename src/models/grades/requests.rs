use serde::Deserialize;
use ts_rs::TS;

use crate::models::assessments::requests::validate_percentage;

// 手动覆盖成绩
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct OverrideGradeRequest {
    pub score: f64,
    pub remarks: Option<String>,
}

impl OverrideGradeRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        validate_percentage(self.score, "Score must be between 0 and 100")
    }
}

// 成绩写入参数（用于存储层），按 (course_id, user_id) 覆盖写入
#[derive(Debug, Clone)]
pub struct GradeUpsert {
    pub course_id: i64,
    pub user_id: i64,
    pub score: f64,
    pub letter_grade: String,
    pub remarks: Option<String>,
    pub is_override: bool,
    pub updated_by: Option<i64>,
}
