use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SessionService;
use crate::models::{ApiResponse, ErrorCode, sessions::entities::CourseSession};
use crate::services::{internal_error, load_course, not_found};
use crate::storage::Storage;

/// 读取课程内的课次，不存在时给出 404 响应
pub(crate) async fn load_session(
    storage: &dyn Storage,
    course_id: i64,
    session_id: i64,
) -> Result<CourseSession, HttpResponse> {
    match storage.get_session(course_id, session_id).await {
        Ok(Some(session)) => Ok(session),
        Ok(None) => Err(not_found(ErrorCode::SessionNotFound, "Session not found")),
        Err(e) => Err(internal_error("Failed to retrieve session", e)),
    }
}

pub async fn list_sessions(
    service: &SessionService,
    course_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    if let Err(resp) = load_course(storage.as_ref(), course_id).await {
        return Ok(resp);
    }

    match storage.list_sessions(course_id).await {
        Ok(sessions) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            sessions,
            "Sessions retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to retrieve sessions", e)),
    }
}

pub async fn get_session(
    service: &SessionService,
    course_id: i64,
    session_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match load_session(storage.as_ref(), course_id, session_id).await {
        Ok(session) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            session,
            "Session retrieved successfully",
        ))),
        Err(resp) => Ok(resp),
    }
}
