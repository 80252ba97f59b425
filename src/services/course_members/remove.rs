use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseMemberService;
use crate::middlewares::CourseAccess;
use crate::models::{ApiResponse, ErrorCode, course_members::entities::CourseRole};
use crate::services::{forbidden, internal_error, not_found};

pub async fn remove_member(
    service: &CourseMemberService,
    course_id: i64,
    user_id: i64,
    access: &CourseAccess,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let member = match storage.get_course_member(course_id, user_id).await {
        Ok(Some(member)) => member,
        Ok(None) => return Ok(not_found(ErrorCode::MemberNotFound, "Member not found")),
        Err(e) => return Ok(internal_error("Failed to remove member", e)),
    };

    // 讲师不能移除其他讲师
    if !access.user.is_admin() && member.role == CourseRole::Instructor {
        return Ok(forbidden(
            ErrorCode::CoursePermissionDenied,
            "Only administrators can remove instructors",
        ));
    }

    match storage.remove_course_member(course_id, user_id).await {
        Ok(true) => {
            tracing::info!("User {user_id} removed from course {course_id}");
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Member removed successfully")))
        }
        Ok(false) => Ok(not_found(ErrorCode::MemberNotFound, "Member not found")),
        Err(e) => Ok(internal_error("Failed to remove member", e)),
    }
}
