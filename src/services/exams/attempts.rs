use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::ExamService;
use super::crud::{load_exam, load_visible_exam};
use crate::middlewares::CourseAccess;
use crate::models::{
    ApiResponse, ErrorCode,
    exams::{
        entities::{AttemptStatus, ExamAttempt, grade_answers},
        requests::SubmitAttemptRequest,
        responses::ExamAttemptResult,
    },
};
use crate::services::{bad_request, conflict, forbidden, internal_error, not_found};
use crate::storage::Storage;

/// 超时的作答以 0 分关闭
async fn expire_attempt(storage: &dyn Storage, attempt: &ExamAttempt) -> crate::errors::Result<()> {
    storage
        .finish_attempt(attempt.id, AttemptStatus::Expired, 0.0, Vec::new())
        .await?;
    warn!(
        "Exam attempt {} of user {} expired",
        attempt.id, attempt.user_id
    );
    Ok(())
}

pub async fn start_attempt(
    service: &ExamService,
    course_id: i64,
    exam_id: i64,
    access: &CourseAccess,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if !access.is_student() {
        return Ok(forbidden(
            ErrorCode::CoursePermissionDenied,
            "Only students of this course can take exams",
        ));
    }

    let exam = match load_visible_exam(storage.as_ref(), course_id, exam_id, access).await {
        Ok(exam) => exam,
        Err(resp) => return Ok(resp),
    };

    let now = chrono::Utc::now();
    if !exam.is_open_at(now) {
        return Ok(bad_request(
            ErrorCode::ExamNotAvailable,
            "Exam is not open",
        ));
    }

    let user_id = access.user_id();
    match storage.find_unfinished_attempt(exam_id, user_id).await {
        Ok(Some(attempt)) if now <= exam.deadline_for(attempt.started_at) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error(
                ErrorCode::AttemptInProgress,
                attempt,
                "An attempt is already in progress",
            )));
        }
        Ok(Some(stale)) => {
            if let Err(e) = expire_attempt(storage.as_ref(), &stale).await {
                return Ok(internal_error("Failed to start attempt", e));
            }
        }
        Ok(None) => {}
        Err(e) => return Ok(internal_error("Failed to start attempt", e)),
    }

    let used = match storage.count_user_attempts(exam_id, user_id).await {
        Ok(count) => count,
        Err(e) => return Ok(internal_error("Failed to start attempt", e)),
    };
    if used >= u64::try_from(exam.max_attempts).unwrap_or(0) {
        return Ok(conflict(
            ErrorCode::AttemptLimitReached,
            format!("Maximum of {} attempts reached", exam.max_attempts),
        ));
    }

    let attempt_number = i32::try_from(used + 1).unwrap_or(i32::MAX);
    match storage.create_attempt(exam_id, user_id, attempt_number).await {
        Ok(attempt) => {
            info!(
                "User {user_id} started attempt {attempt_number} (id {}) on exam {exam_id}",
                attempt.id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                attempt,
                "Attempt started",
            )))
        }
        // 同一次作答被并发开始
        Err(e) if e.is_conflict() => Ok(conflict(
            ErrorCode::AttemptInProgress,
            "An attempt is already in progress",
        )),
        Err(e) => Ok(internal_error("Failed to start attempt", e)),
    }
}

pub async fn submit_attempt(
    service: &ExamService,
    course_id: i64,
    exam_id: i64,
    attempt_id: i64,
    access: &CourseAccess,
    submit_data: SubmitAttemptRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let exam = match load_exam(storage.as_ref(), course_id, exam_id).await {
        Ok(exam) => exam,
        Err(resp) => return Ok(resp),
    };

    let attempt = match storage.get_attempt(exam_id, attempt_id).await {
        Ok(Some(attempt)) => attempt,
        Ok(None) => return Ok(not_found(ErrorCode::AttemptNotFound, "Attempt not found")),
        Err(e) => return Ok(internal_error("Failed to submit attempt", e)),
    };

    if attempt.user_id != access.user_id() {
        return Ok(forbidden(
            ErrorCode::Forbidden,
            "Attempt belongs to another user",
        ));
    }
    if attempt.status != AttemptStatus::InProgress {
        return Ok(conflict(
            ErrorCode::AttemptAlreadySubmitted,
            "Attempt has already been submitted",
        ));
    }

    if chrono::Utc::now() > exam.deadline_for(attempt.started_at) {
        if let Err(e) = expire_attempt(storage.as_ref(), &attempt).await {
            return Ok(internal_error("Failed to submit attempt", e));
        }
        return Ok(bad_request(
            ErrorCode::ExamAttemptExpired,
            "Time limit exceeded, attempt closed with score 0",
        ));
    }

    let questions = match storage.list_questions(exam_id).await {
        Ok(questions) => questions,
        Err(e) => return Ok(internal_error("Failed to submit attempt", e)),
    };

    let submitted: Vec<(i64, String)> = submit_data
        .answers
        .into_iter()
        .map(|a| (a.question_id, a.answer))
        .collect();
    let graded = grade_answers(&questions, &submitted);
    let score = graded.score();

    match storage
        .finish_attempt(attempt_id, AttemptStatus::Submitted, score, graded.answers)
        .await
    {
        Ok(Some((attempt, answers))) => {
            info!(
                "User {} submitted attempt {attempt_id} with score {score}",
                attempt.user_id
            );
            let result = ExamAttemptResult {
                attempt,
                answers,
                earned_points: graded.earned_points,
                total_points: graded.total_points,
                passed: exam.passing_score.map(|passing| score >= passing),
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(result, "Attempt submitted")))
        }
        // 并发交卷，另一请求已结束本次作答
        Ok(None) => Ok(conflict(
            ErrorCode::AttemptAlreadySubmitted,
            "Attempt has already been submitted",
        )),
        Err(e) => Ok(internal_error("Failed to submit attempt", e)),
    }
}

pub async fn list_attempts(
    service: &ExamService,
    course_id: i64,
    exam_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    if let Err(resp) = load_exam(storage.as_ref(), course_id, exam_id).await {
        return Ok(resp);
    }

    match storage.list_attempts(exam_id).await {
        Ok(attempts) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            attempts,
            "Attempts retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to retrieve attempts", e)),
    }
}

pub async fn my_attempts(
    service: &ExamService,
    course_id: i64,
    exam_id: i64,
    access: &CourseAccess,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    if let Err(resp) = load_visible_exam(storage.as_ref(), course_id, exam_id, access).await {
        return Ok(resp);
    }

    match storage.list_user_attempts(exam_id, access.user_id()).await {
        Ok(attempts) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            attempts,
            "Attempts retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to retrieve attempts", e)),
    }
}
