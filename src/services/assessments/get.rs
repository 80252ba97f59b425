use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssessmentService;
use crate::middlewares::CourseAccess;
use crate::models::{
    ApiResponse, ErrorCode,
    assessments::entities::{Assessment, PublishStatus},
};
use crate::services::{internal_error, not_found};
use crate::storage::Storage;

/// 读取课程内的考核项，不存在时给出 404 响应
pub(crate) async fn load_assessment(
    storage: &dyn Storage,
    course_id: i64,
    assessment_id: i64,
) -> Result<Assessment, HttpResponse> {
    match storage.get_assessment(course_id, assessment_id).await {
        Ok(Some(assessment)) => Ok(assessment),
        Ok(None) => Err(not_found(
            ErrorCode::AssessmentNotFound,
            "Assessment not found",
        )),
        Err(e) => Err(internal_error("Failed to retrieve assessment", e)),
    }
}

pub async fn get_assessment(
    service: &AssessmentService,
    course_id: i64,
    assessment_id: i64,
    access: &CourseAccess,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match load_assessment(storage.as_ref(), course_id, assessment_id).await {
        // 草稿对学生不可见
        Ok(assessment)
            if !access.is_instructor() && assessment.status == PublishStatus::Draft =>
        {
            Ok(not_found(
                ErrorCode::AssessmentNotFound,
                "Assessment not found",
            ))
        }
        Ok(assessment) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            assessment,
            "Assessment retrieved successfully",
        ))),
        Err(resp) => Ok(resp),
    }
}
