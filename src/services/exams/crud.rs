use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ExamService;
use crate::middlewares::CourseAccess;
use crate::models::{
    ApiResponse, ErrorCode,
    assessments::{entities::PublishStatus, requests::validate_window},
    exams::{
        entities::Exam,
        requests::{CreateExamRequest, UpdateExamRequest},
    },
};
use crate::services::{bad_request, internal_error, load_course, not_found};
use crate::storage::Storage;

/// 读取课程内的考试，不存在时给出 404 响应
pub(crate) async fn load_exam(
    storage: &dyn Storage,
    course_id: i64,
    exam_id: i64,
) -> Result<Exam, HttpResponse> {
    match storage.get_exam(course_id, exam_id).await {
        Ok(Some(exam)) => Ok(exam),
        Ok(None) => Err(not_found(ErrorCode::ExamNotFound, "Exam not found")),
        Err(e) => Err(internal_error("Failed to retrieve exam", e)),
    }
}

/// 学生只能访问已发布的考试
pub(crate) async fn load_visible_exam(
    storage: &dyn Storage,
    course_id: i64,
    exam_id: i64,
    access: &CourseAccess,
) -> Result<Exam, HttpResponse> {
    let exam = load_exam(storage, course_id, exam_id).await?;
    if !access.is_instructor() && exam.status != PublishStatus::Published {
        return Err(not_found(ErrorCode::ExamNotFound, "Exam not found"));
    }
    Ok(exam)
}

pub async fn list_exams(
    service: &ExamService,
    course_id: i64,
    access: &CourseAccess,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.list_exams(course_id, !access.is_instructor()).await {
        Ok(exams) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            exams,
            "Exams retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to retrieve exams", e)),
    }
}

pub async fn create_exam(
    service: &ExamService,
    course_id: i64,
    access: &CourseAccess,
    exam_data: CreateExamRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if let Err(msg) = exam_data.validate() {
        return Ok(bad_request(ErrorCode::ExamInvalid, msg));
    }
    if let Err(resp) = load_course(storage.as_ref(), course_id).await {
        return Ok(resp);
    }

    match storage
        .create_exam(course_id, access.user_id(), exam_data)
        .await
    {
        Ok(exam) => {
            tracing::info!("Exam {} created in course {course_id}", exam.title);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                exam,
                "Exam created successfully",
            )))
        }
        Err(e) => Ok(internal_error("Exam creation failed", e)),
    }
}

pub async fn get_exam(
    service: &ExamService,
    course_id: i64,
    exam_id: i64,
    access: &CourseAccess,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match load_visible_exam(storage.as_ref(), course_id, exam_id, access).await {
        Ok(exam) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            exam,
            "Exam retrieved successfully",
        ))),
        Err(resp) => Ok(resp),
    }
}

pub async fn update_exam(
    service: &ExamService,
    course_id: i64,
    exam_id: i64,
    update_data: UpdateExamRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if let Err(msg) = update_data.validate() {
        return Ok(bad_request(ErrorCode::ExamInvalid, msg));
    }
    let existing = match load_exam(storage.as_ref(), course_id, exam_id).await {
        Ok(exam) => exam,
        Err(resp) => return Ok(resp),
    };
    if let Err(msg) = validate_window(
        update_data.available_from.or(existing.available_from),
        update_data.available_to.or(existing.available_to),
    ) {
        return Ok(bad_request(ErrorCode::ExamInvalid, msg));
    }

    match storage.update_exam(course_id, exam_id, update_data).await {
        Ok(Some(exam)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            exam,
            "Exam updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::ExamNotFound, "Exam not found")),
        Err(e) => Ok(internal_error("Exam update failed", e)),
    }
}

pub async fn delete_exam(
    service: &ExamService,
    course_id: i64,
    exam_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.delete_exam(course_id, exam_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Exam deleted successfully"))),
        Ok(false) => Ok(not_found(ErrorCode::ExamNotFound, "Exam not found")),
        Err(e) => Ok(internal_error("Exam deletion failed", e)),
    }
}
