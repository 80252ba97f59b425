use super::entities::CourseMemberDetail;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course_member.ts")]
pub struct CourseMemberListResponse {
    pub items: Vec<CourseMemberDetail>,
    pub pagination: PaginationInfo,
}
