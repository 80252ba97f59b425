use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::CourseService;
use crate::models::{ApiResponse, ErrorCode, courses::requests::CreateCourseRequest};
use crate::services::{bad_request, conflict, internal_error};

pub async fn create_course(
    service: &CourseService,
    course_data: CreateCourseRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if let Err(msg) = course_data.validate() {
        return Ok(bad_request(ErrorCode::CourseInvalid, msg));
    }

    match storage.get_course_by_code(course_data.code.trim()).await {
        Ok(Some(_)) => {
            return Ok(conflict(
                ErrorCode::CourseAlreadyExists,
                "Course code already exists",
            ));
        }
        Ok(None) => {}
        Err(e) => return Ok(internal_error("Course creation failed", e)),
    }

    // 并发创建时仍可能触发唯一约束
    match storage.create_course(course_data).await {
        Ok(course) => {
            info!("Course {} created", course.code);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                course,
                "Course created successfully",
            )))
        }
        Err(e) if e.is_conflict() => Ok(conflict(
            ErrorCode::CourseAlreadyExists,
            "Course code already exists",
        )),
        Err(e) => Ok(internal_error("Course creation failed", e)),
    }
}
