use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AssessmentService;
use super::get::load_assessment;
use crate::middlewares::CourseAccess;
use crate::models::{
    ApiResponse, ErrorCode,
    assessments::requests::{GradeSubmissionRequest, SubmitAssessmentRequest},
};
use crate::services::{bad_request, conflict, forbidden, internal_error, not_found};

pub async fn submit(
    service: &AssessmentService,
    course_id: i64,
    assessment_id: i64,
    access: &CourseAccess,
    submit_data: SubmitAssessmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if !access.is_student() {
        return Ok(forbidden(
            ErrorCode::CoursePermissionDenied,
            "Only students of this course can submit",
        ));
    }
    if submit_data.content.trim().is_empty() {
        return Ok(bad_request(
            ErrorCode::SubmissionInvalid,
            "Submission content must not be empty",
        ));
    }

    let assessment = match load_assessment(storage.as_ref(), course_id, assessment_id).await {
        Ok(assessment) => assessment,
        Err(resp) => return Ok(resp),
    };

    let now = chrono::Utc::now();
    if !assessment.is_open_at(now) {
        return Ok(bad_request(
            ErrorCode::AssessmentNotAvailable,
            "Assessment is not open for submissions",
        ));
    }

    let user_id = access.user_id();
    let used = match storage.count_user_submissions(assessment_id, user_id).await {
        Ok(count) => count as i64,
        Err(e) => return Ok(internal_error("Submission failed", e)),
    };
    if assessment.attempts_exhausted(used) {
        return Ok(conflict(
            ErrorCode::SubmissionLimitReached,
            format!("Maximum of {} attempts reached", assessment.max_attempts),
        ));
    }

    let attempt_number = i32::try_from(used + 1).unwrap_or(i32::MAX);
    match storage
        .create_submission(
            assessment_id,
            user_id,
            attempt_number,
            submit_data.content,
            assessment.is_late_at(now),
        )
        .await
    {
        Ok(submission) => {
            info!(
                "User {user_id} submitted attempt {attempt_number} for assessment {assessment_id}"
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                submission,
                "Submission received",
            )))
        }
        // 同一次尝试被并发提交
        Err(e) if e.is_conflict() => Ok(conflict(
            ErrorCode::SubmissionLimitReached,
            "Submission already recorded, please retry",
        )),
        Err(e) => Ok(internal_error("Submission failed", e)),
    }
}

pub async fn list_submissions(
    service: &AssessmentService,
    course_id: i64,
    assessment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    if let Err(resp) = load_assessment(storage.as_ref(), course_id, assessment_id).await {
        return Ok(resp);
    }

    match storage.list_submissions(assessment_id).await {
        Ok(submissions) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            submissions,
            "Submissions retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to retrieve submissions", e)),
    }
}

pub async fn my_submissions(
    service: &AssessmentService,
    course_id: i64,
    assessment_id: i64,
    access: &CourseAccess,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    if let Err(resp) = load_assessment(storage.as_ref(), course_id, assessment_id).await {
        return Ok(resp);
    }

    match storage
        .list_user_submissions(assessment_id, access.user_id())
        .await
    {
        Ok(submissions) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            submissions,
            "Submissions retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to retrieve submissions", e)),
    }
}

pub async fn grade_submission(
    service: &AssessmentService,
    course_id: i64,
    assessment_id: i64,
    submission_id: i64,
    access: &CourseAccess,
    grade_data: GradeSubmissionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if let Err(msg) = grade_data.validate() {
        return Ok(bad_request(ErrorCode::SubmissionInvalid, msg));
    }
    if let Err(resp) = load_assessment(storage.as_ref(), course_id, assessment_id).await {
        return Ok(resp);
    }

    match storage.get_submission(assessment_id, submission_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(not_found(
                ErrorCode::SubmissionNotFound,
                "Submission not found",
            ));
        }
        Err(e) => return Ok(internal_error("Grading failed", e)),
    }

    match storage
        .grade_submission(
            submission_id,
            grade_data.score,
            grade_data.feedback,
            access.user_id(),
        )
        .await
    {
        Ok(Some(submission)) => {
            info!(
                "Submission {submission_id} graded {} by user {}",
                grade_data.score,
                access.user_id()
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                submission,
                "Submission graded successfully",
            )))
        }
        Ok(None) => Ok(not_found(
            ErrorCode::SubmissionNotFound,
            "Submission not found",
        )),
        Err(e) => Ok(internal_error("Grading failed", e)),
    }
}
