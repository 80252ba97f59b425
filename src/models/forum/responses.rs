use super::entities::ForumThread;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/forum.ts")]
pub struct ThreadListResponse {
    pub items: Vec<ForumThread>,
    pub pagination: PaginationInfo,
}
