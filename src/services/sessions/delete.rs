use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SessionService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{internal_error, not_found};

pub async fn delete_session(
    service: &SessionService,
    course_id: i64,
    session_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.delete_session(course_id, session_id).await {
        Ok(true) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Session deleted successfully")))
        }
        Ok(false) => Ok(not_found(ErrorCode::SessionNotFound, "Session not found")),
        Err(e) => Ok(internal_error("Session deletion failed", e)),
    }
}
