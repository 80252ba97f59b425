use serde::Deserialize;
use ts_rs::TS;

use super::entities::CourseRole;
use crate::models::common::PaginationQuery;

// 添加成员请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course_member.ts")]
pub struct AddMemberRequest {
    pub user_id: i64,
    pub role: CourseRole,
    #[serde(default)]
    pub is_main: bool,
}

// 更新成员请求
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course_member.ts")]
pub struct UpdateMemberRequest {
    pub role: Option<CourseRole>,
    pub is_main: Option<bool>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course_member.ts")]
pub struct MemberListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub role: Option<CourseRole>,
}

// 成员列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct MemberListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub role: Option<CourseRole>,
}

impl From<MemberListParams> for MemberListQuery {
    fn from(params: MemberListParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            role: params.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_member_defaults_is_main() {
        let req: AddMemberRequest =
            serde_json::from_str(r#"{"user_id": 3, "role": "student"}"#).unwrap();
        assert_eq!(req.role, CourseRole::Student);
        assert!(!req.is_main);
    }

    #[test]
    fn test_add_member_rejects_unknown_role() {
        let result: Result<AddMemberRequest, _> =
            serde_json::from_str(r#"{"user_id": 3, "role": "admin"}"#);
        assert!(result.is_err());
    }
}
