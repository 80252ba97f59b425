use serde::{Deserialize, Serialize};
use ts_rs::TS;

crate::define_string_enum! {
    // 课程内角色，与全局用户角色相互独立
    #[ts(export, export_to = "../frontend/src/types/generated/course_member.ts")]
    pub enum CourseRole {
        Instructor => "instructor",
        Student => "student",
    }
}

impl CourseRole {
    pub fn instructor_roles() -> &'static [&'static CourseRole] {
        &[&Self::Instructor]
    }
    pub fn all_roles() -> &'static [&'static CourseRole] {
        &[&Self::Instructor, &Self::Student]
    }
}

// 课程成员实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course_member.ts")]
pub struct CourseMember {
    pub id: i64,
    pub course_id: i64,
    pub user_id: i64,
    pub role: CourseRole,
    /// 是否为主讲教师
    pub is_main: bool,
    pub joined_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 带用户信息的成员，列表接口使用
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course_member.ts")]
pub struct CourseMemberDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub member: CourseMember,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
}
