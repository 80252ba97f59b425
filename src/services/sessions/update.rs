use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SessionService;
use super::get::load_session;
use crate::models::{ApiResponse, ErrorCode, sessions::requests::UpdateSessionRequest};
use crate::services::{bad_request, conflict, internal_error, not_found};

pub async fn update_session(
    service: &SessionService,
    course_id: i64,
    session_id: i64,
    update_data: UpdateSessionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let existing = match load_session(storage.as_ref(), course_id, session_id).await {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };

    // 与现有值合并后再检查时间与编号
    let starts_at = update_data.starts_at.unwrap_or(existing.starts_at);
    let ends_at = update_data.ends_at.unwrap_or(existing.ends_at);
    if ends_at < starts_at {
        return Ok(bad_request(
            ErrorCode::SessionInvalid,
            "Session must not end before it starts",
        ));
    }
    if update_data.number.is_some_and(|n| n < 1) {
        return Ok(bad_request(
            ErrorCode::SessionInvalid,
            "Session number must be positive",
        ));
    }
    if update_data
        .title
        .as_deref()
        .is_some_and(|t| t.trim().is_empty())
    {
        return Ok(bad_request(
            ErrorCode::SessionInvalid,
            "Session title must not be empty",
        ));
    }

    match storage
        .update_session(course_id, session_id, update_data)
        .await
    {
        Ok(Some(session)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            session,
            "Session updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::SessionNotFound, "Session not found")),
        Err(e) if e.is_conflict() => Ok(conflict(
            ErrorCode::SessionAlreadyExists,
            "Session number already used in this course",
        )),
        Err(e) => Ok(internal_error("Session update failed", e)),
    }
}
