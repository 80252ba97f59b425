use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ExamService;
use super::crud::{load_exam, load_visible_exam};
use crate::middlewares::CourseAccess;
use crate::models::{
    ApiResponse, ErrorCode,
    exams::{
        entities::ExamQuestion,
        requests::{CreateQuestionRequest, UpdateQuestionRequest},
    },
};
use crate::services::{bad_request, internal_error, not_found};

pub async fn list_questions(
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

    match storage.list_questions(exam_id).await {
        Ok(questions) => {
            let questions: Vec<ExamQuestion> = if access.is_instructor() {
                questions
            } else {
                questions
                    .into_iter()
                    .map(ExamQuestion::without_answer)
                    .collect()
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                questions,
                "Questions retrieved successfully",
            )))
        }
        Err(e) => Ok(internal_error("Failed to retrieve questions", e)),
    }
}

pub async fn create_question(
    service: &ExamService,
    course_id: i64,
    exam_id: i64,
    question_data: CreateQuestionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if let Err(msg) = question_data.validate() {
        return Ok(bad_request(ErrorCode::QuestionInvalid, msg));
    }
    if let Err(resp) = load_exam(storage.as_ref(), course_id, exam_id).await {
        return Ok(resp);
    }

    match storage.create_question(exam_id, question_data).await {
        Ok(question) => Ok(HttpResponse::Created().json(ApiResponse::success(
            question,
            "Question created successfully",
        ))),
        Err(e) => Ok(internal_error("Question creation failed", e)),
    }
}

pub async fn update_question(
    service: &ExamService,
    course_id: i64,
    exam_id: i64,
    question_id: i64,
    update_data: UpdateQuestionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if let Err(msg) = update_data.validate() {
        return Ok(bad_request(ErrorCode::QuestionInvalid, msg));
    }
    if let Err(resp) = load_exam(storage.as_ref(), course_id, exam_id).await {
        return Ok(resp);
    }

    match storage
        .update_question(exam_id, question_id, update_data)
        .await
    {
        Ok(Some(question)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            question,
            "Question updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::QuestionNotFound, "Question not found")),
        Err(e) => Ok(internal_error("Question update failed", e)),
    }
}

pub async fn delete_question(
    service: &ExamService,
    course_id: i64,
    exam_id: i64,
    question_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    if let Err(resp) = load_exam(storage.as_ref(), course_id, exam_id).await {
        return Ok(resp);
    }

    match storage.delete_question(exam_id, question_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Question deleted successfully",
        ))),
        Ok(false) => Ok(not_found(ErrorCode::QuestionNotFound, "Question not found")),
        Err(e) => Ok(internal_error("Question deletion failed", e)),
    }
}
