use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssessmentService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{internal_error, not_found};

pub async fn delete_assessment(
    service: &AssessmentService,
    course_id: i64,
    assessment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.delete_assessment(course_id, assessment_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Assessment deleted successfully",
        ))),
        Ok(false) => Ok(not_found(
            ErrorCode::AssessmentNotFound,
            "Assessment not found",
        )),
        Err(e) => Ok(internal_error("Assessment deletion failed", e)),
    }
}
