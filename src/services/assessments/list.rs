use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssessmentService;
use crate::middlewares::CourseAccess;
use crate::models::{
    ApiResponse,
    assessments::{
        entities::PublishStatus,
        requests::{AssessmentListParams, AssessmentListQuery},
    },
};
use crate::services::internal_error;

pub async fn list_assessments(
    service: &AssessmentService,
    course_id: i64,
    access: &CourseAccess,
    query: AssessmentListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let mut query = AssessmentListQuery::from(query);
    if !access.is_instructor() {
        query.status = Some(PublishStatus::Published);
    }

    match storage
        .list_assessments_with_pagination(course_id, query)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Assessments retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to retrieve assessments", e)),
    }
}
