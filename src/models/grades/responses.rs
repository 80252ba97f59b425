use super::entities::Grade;
use serde::Serialize;
use ts_rs::TS;

// 批量计算结果
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradeCalculationResponse {
    pub calculated: usize,
    /// 保留了手动覆盖成绩而跳过的学生数
    pub skipped_overrides: usize,
    pub grades: Vec<Grade>,
}
