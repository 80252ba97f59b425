use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssessmentService;
use super::get::load_assessment;
use crate::models::{
    ApiResponse, ErrorCode,
    assessments::requests::{UpdateAssessmentRequest, validate_window},
};
use crate::services::{bad_request, internal_error, not_found};

pub async fn update_assessment(
    service: &AssessmentService,
    course_id: i64,
    assessment_id: i64,
    update_data: UpdateAssessmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if let Err(msg) = update_data.validate() {
        return Ok(bad_request(ErrorCode::AssessmentInvalid, msg));
    }

    let existing = match load_assessment(storage.as_ref(), course_id, assessment_id).await {
        Ok(assessment) => assessment,
        Err(resp) => return Ok(resp),
    };
    // 只修改一端时也要与另一端的现有值比较
    if let Err(msg) = validate_window(
        update_data.available_from.or(existing.available_from),
        update_data.available_to.or(existing.available_to),
    ) {
        return Ok(bad_request(ErrorCode::AssessmentInvalid, msg));
    }

    match storage
        .update_assessment(course_id, assessment_id, update_data)
        .await
    {
        Ok(Some(assessment)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            assessment,
            "Assessment updated successfully",
        ))),
        Ok(None) => Ok(not_found(
            ErrorCode::AssessmentNotFound,
            "Assessment not found",
        )),
        Err(e) => Ok(internal_error("Assessment update failed", e)),
    }
}
