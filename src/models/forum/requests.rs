use serde::Deserialize;
use ts_rs::TS;

use super::entities::{ThreadKind, ThreadStatus};
use crate::models::common::PaginationQuery;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/forum.ts")]
pub struct CreateThreadRequest {
    pub title: String,
    pub content: String,
    pub kind: Option<ThreadKind>,
}

impl CreateThreadRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.title.trim().is_empty() {
            return Err("Thread title must not be empty");
        }
        if self.content.trim().is_empty() {
            return Err("Thread content must not be empty");
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/forum.ts")]
pub struct UpdateThreadRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub status: Option<ThreadStatus>,
    pub pinned: Option<bool>,
}

impl UpdateThreadRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(title) = &self.title
            && title.trim().is_empty()
        {
            return Err("Thread title must not be empty");
        }
        if let Some(content) = &self.content
            && content.trim().is_empty()
        {
            return Err("Thread content must not be empty");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/forum.ts")]
pub struct ThreadListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
}

// 主题列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct ThreadListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub search: Option<String>,
}

impl From<ThreadListParams> for ThreadListQuery {
    fn from(params: ThreadListParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            search: params.search,
        }
    }
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/forum.ts")]
pub struct CreateMessageRequest {
    pub content: String,
    pub parent_id: Option<i64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/forum.ts")]
pub struct UpdateMessageRequest {
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_kind_is_optional() {
        let req: CreateThreadRequest =
            serde_json::from_str(r#"{"title": "Help", "content": "Lab 2 question"}"#).unwrap();
        assert!(req.kind.is_none());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_update_thread_status() {
        let req: UpdateThreadRequest = serde_json::from_str(r#"{"status": "closed"}"#).unwrap();
        assert_eq!(req.status, Some(ThreadStatus::Closed));
        assert!(serde_json::from_str::<UpdateThreadRequest>(r#"{"status": "locked"}"#).is_err());
    }
}
