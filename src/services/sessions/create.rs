use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SessionService;
use crate::models::{ApiResponse, ErrorCode, sessions::requests::CreateSessionRequest};
use crate::services::{bad_request, conflict, internal_error, load_course};

pub async fn create_session(
    service: &SessionService,
    course_id: i64,
    session_data: CreateSessionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if let Err(msg) = session_data.validate() {
        return Ok(bad_request(ErrorCode::SessionInvalid, msg));
    }
    if let Err(resp) = load_course(storage.as_ref(), course_id).await {
        return Ok(resp);
    }

    match storage.create_session(course_id, session_data).await {
        Ok(session) => {
            tracing::info!("Session {} created in course {course_id}", session.number);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                session,
                "Session created successfully",
            )))
        }
        Err(e) if e.is_conflict() => Ok(conflict(
            ErrorCode::SessionAlreadyExists,
            "Session number already used in this course",
        )),
        Err(e) => Ok(internal_error("Session creation failed", e)),
    }
}
