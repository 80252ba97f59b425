use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssessmentService;
use crate::middlewares::CourseAccess;
use crate::models::{ApiResponse, ErrorCode, assessments::requests::CreateAssessmentRequest};
use crate::services::{bad_request, internal_error, load_course};

pub async fn create_assessment(
    service: &AssessmentService,
    course_id: i64,
    access: &CourseAccess,
    assessment_data: CreateAssessmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if let Err(msg) = assessment_data.validate() {
        return Ok(bad_request(ErrorCode::AssessmentInvalid, msg));
    }
    if let Err(resp) = load_course(storage.as_ref(), course_id).await {
        return Ok(resp);
    }

    match storage
        .create_assessment(course_id, access.user_id(), assessment_data)
        .await
    {
        Ok(assessment) => {
            tracing::info!(
                "Assessment {} created in course {course_id}",
                assessment.title
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                assessment,
                "Assessment created successfully",
            )))
        }
        Err(e) => Ok(internal_error("Assessment creation failed", e)),
    }
}
