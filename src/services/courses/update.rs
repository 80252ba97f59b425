use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseService;
use crate::models::{ApiResponse, ErrorCode, courses::requests::UpdateCourseRequest};
use crate::services::{bad_request, conflict, internal_error, not_found};

pub async fn update_course(
    service: &CourseService,
    course_id: i64,
    update_data: UpdateCourseRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if let Err(msg) = update_data.validate() {
        return Ok(bad_request(ErrorCode::CourseInvalid, msg));
    }

    match storage.update_course(course_id, update_data).await {
        Ok(Some(course)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            course,
            "Course updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::CourseNotFound, "Course not found")),
        Err(e) if e.is_conflict() => Ok(conflict(
            ErrorCode::CourseAlreadyExists,
            "Course code already exists",
        )),
        Err(e) => Ok(internal_error("Course update failed", e)),
    }
}
