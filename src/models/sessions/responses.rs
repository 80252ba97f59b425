use super::entities::{Attendance, AttendanceSummary};
use serde::Serialize;
use ts_rs::TS;

// 当前用户在某课程的考勤
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/session.ts")]
pub struct MyAttendanceResponse {
    pub records: Vec<Attendance>,
    pub summary: AttendanceSummary,
}
