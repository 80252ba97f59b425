use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseMemberService;
use super::add::role_matches;
use crate::models::{ApiResponse, ErrorCode, course_members::requests::UpdateMemberRequest};
use crate::services::{bad_request, internal_error, not_found};

pub async fn update_member(
    service: &CourseMemberService,
    course_id: i64,
    user_id: i64,
    update_data: UpdateMemberRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if let Some(role) = update_data.role {
        match storage.get_user_by_id(user_id).await {
            Ok(Some(user)) if role_matches(&user, role) => {}
            Ok(Some(user)) => {
                return Ok(bad_request(
                    ErrorCode::MemberRoleInvalid,
                    format!("User with role {} cannot be {role}", user.role),
                ));
            }
            Ok(None) => return Ok(not_found(ErrorCode::UserNotFound, "User not found")),
            Err(e) => return Ok(internal_error("Failed to update member", e)),
        }
    }

    match storage
        .update_course_member(course_id, user_id, update_data)
        .await
    {
        Ok(Some(member)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            member,
            "Member updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::MemberNotFound, "Member not found")),
        Err(e) => Ok(internal_error("Failed to update member", e)),
    }
}
