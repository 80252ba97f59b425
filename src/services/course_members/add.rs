use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::CourseMemberService;
use crate::middlewares::CourseAccess;
use crate::models::{
    ApiResponse, ErrorCode,
    course_members::{entities::CourseRole, requests::AddMemberRequest},
    users::entities::{User, UserRole},
};
use crate::services::{bad_request, conflict, forbidden, internal_error, load_course, not_found};

/// 课程角色须与全局角色一致：讲师成员必须是讲师或管理员，学生成员必须是学生
pub(crate) fn role_matches(user: &User, role: CourseRole) -> bool {
    match role {
        CourseRole::Instructor => matches!(user.role, UserRole::Instructor | UserRole::Admin),
        CourseRole::Student => user.role == UserRole::Student,
    }
}

pub async fn add_member(
    service: &CourseMemberService,
    course_id: i64,
    access: &CourseAccess,
    member_data: AddMemberRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if !access.user.is_admin() && member_data.role != CourseRole::Student {
        return Ok(forbidden(
            ErrorCode::CoursePermissionDenied,
            "Only administrators can add instructors",
        ));
    }

    if let Err(resp) = load_course(storage.as_ref(), course_id).await {
        return Ok(resp);
    }

    let user = match storage.get_user_by_id(member_data.user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => return Ok(not_found(ErrorCode::UserNotFound, "User not found")),
        Err(e) => return Ok(internal_error("Failed to add member", e)),
    };

    if !role_matches(&user, member_data.role) {
        return Ok(bad_request(
            ErrorCode::MemberRoleInvalid,
            format!(
                "User with role {} cannot join as {}",
                user.role, member_data.role
            ),
        ));
    }

    match storage.add_course_member(course_id, member_data).await {
        Ok(member) => {
            info!(
                "User {} joined course {course_id} as {}",
                user.username, member.role
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                member,
                "Member added successfully",
            )))
        }
        Err(e) if e.is_conflict() => Ok(conflict(
            ErrorCode::MemberAlreadyExists,
            "User is already a member of this course",
        )),
        Err(e) => Ok(internal_error("Failed to add member", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::{UserProfile, UserStatus};

    fn user(role: UserRole) -> User {
        User {
            id: 1,
            username: "member".into(),
            email: "member@example.com".into(),
            password_hash: String::new(),
            role,
            status: UserStatus::Active,
            profile: UserProfile::default(),
            last_login: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_role_matches_global_role() {
        assert!(role_matches(&user(UserRole::Instructor), CourseRole::Instructor));
        assert!(role_matches(&user(UserRole::Admin), CourseRole::Instructor));
        assert!(!role_matches(&user(UserRole::Student), CourseRole::Instructor));
        assert!(role_matches(&user(UserRole::Student), CourseRole::Student));
        assert!(!role_matches(&user(UserRole::Instructor), CourseRole::Student));
    }
}
