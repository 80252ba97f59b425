use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseMemberService;
use crate::models::{ApiResponse, course_members::requests::MemberListParams};
use crate::services::{internal_error, load_course};

pub async fn list_members(
    service: &CourseMemberService,
    course_id: i64,
    query: MemberListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    if let Err(resp) = load_course(storage.as_ref(), course_id).await {
        return Ok(resp);
    }

    match storage
        .list_course_members_with_pagination(course_id, query.into())
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Course members retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to retrieve course members", e)),
    }
}
