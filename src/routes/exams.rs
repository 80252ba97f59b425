use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, CourseAccess};
use crate::models::course_members::entities::CourseRole;
use crate::models::exams::requests::{
    CreateExamRequest, CreateQuestionRequest, SubmitAttemptRequest, UpdateExamRequest,
    UpdateQuestionRequest,
};
use crate::services::ExamService;
use crate::utils::{SafeAttemptId, SafeCourseId, SafeExamId, SafeQuestionId};

static EXAM_SERVICE: Lazy<ExamService> = Lazy::new(ExamService::new_lazy);

pub async fn list_exams(
    req: HttpRequest,
    course_id: SafeCourseId,
    access: CourseAccess,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.list_exams(course_id.0, &access, &req).await
}

pub async fn create_exam(
    req: HttpRequest,
    course_id: SafeCourseId,
    access: CourseAccess,
    exam_data: web::Json<CreateExamRequest>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE
        .create_exam(course_id.0, &access, exam_data.into_inner(), &req)
        .await
}

pub async fn get_exam(
    req: HttpRequest,
    course_id: SafeCourseId,
    exam_id: SafeExamId,
    access: CourseAccess,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE
        .get_exam(course_id.0, exam_id.0, &access, &req)
        .await
}

pub async fn update_exam(
    req: HttpRequest,
    course_id: SafeCourseId,
    exam_id: SafeExamId,
    update_data: web::Json<UpdateExamRequest>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE
        .update_exam(course_id.0, exam_id.0, update_data.into_inner(), &req)
        .await
}

pub async fn delete_exam(
    req: HttpRequest,
    course_id: SafeCourseId,
    exam_id: SafeExamId,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.delete_exam(course_id.0, exam_id.0, &req).await
}

pub async fn list_questions(
    req: HttpRequest,
    course_id: SafeCourseId,
    exam_id: SafeExamId,
    access: CourseAccess,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE
        .list_questions(course_id.0, exam_id.0, &access, &req)
        .await
}

pub async fn create_question(
    req: HttpRequest,
    course_id: SafeCourseId,
    exam_id: SafeExamId,
    question_data: web::Json<CreateQuestionRequest>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE
        .create_question(course_id.0, exam_id.0, question_data.into_inner(), &req)
        .await
}

pub async fn update_question(
    req: HttpRequest,
    course_id: SafeCourseId,
    exam_id: SafeExamId,
    question_id: SafeQuestionId,
    update_data: web::Json<UpdateQuestionRequest>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE
        .update_question(
            course_id.0,
            exam_id.0,
            question_id.0,
            update_data.into_inner(),
            &req,
        )
        .await
}

pub async fn delete_question(
    req: HttpRequest,
    course_id: SafeCourseId,
    exam_id: SafeExamId,
    question_id: SafeQuestionId,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE
        .delete_question(course_id.0, exam_id.0, question_id.0, &req)
        .await
}

pub async fn start_attempt(
    req: HttpRequest,
    course_id: SafeCourseId,
    exam_id: SafeExamId,
    access: CourseAccess,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE
        .start_attempt(course_id.0, exam_id.0, &access, &req)
        .await
}

pub async fn submit_attempt(
    req: HttpRequest,
    course_id: SafeCourseId,
    exam_id: SafeExamId,
    attempt_id: SafeAttemptId,
    access: CourseAccess,
    submit_data: web::Json<SubmitAttemptRequest>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE
        .submit_attempt(
            course_id.0,
            exam_id.0,
            attempt_id.0,
            &access,
            submit_data.into_inner(),
            &req,
        )
        .await
}

pub async fn list_attempts(
    req: HttpRequest,
    course_id: SafeCourseId,
    exam_id: SafeExamId,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE
        .list_attempts(course_id.0, exam_id.0, &req)
        .await
}

pub async fn my_attempts(
    req: HttpRequest,
    course_id: SafeCourseId,
    exam_id: SafeExamId,
    access: CourseAccess,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE
        .my_attempts(course_id.0, exam_id.0, &access, &req)
        .await
}

fn any_member() -> middlewares::RequireCourseRole {
    middlewares::RequireCourseRole::new_any(CourseRole::all_roles())
}

fn instructor() -> middlewares::RequireCourseRole {
    middlewares::RequireCourseRole::new(&CourseRole::Instructor)
}

fn student() -> middlewares::RequireCourseRole {
    middlewares::RequireCourseRole::new(&CourseRole::Student)
}

pub fn configure_exams_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/courses/{course_id}/exams")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_exams).wrap(any_member()))
                    .route(web::post().to(create_exam).wrap(instructor())),
            )
            .service(
                web::resource("/{exam_id}")
                    .route(web::get().to(get_exam).wrap(any_member()))
                    .route(web::put().to(update_exam).wrap(instructor()))
                    .route(web::delete().to(delete_exam).wrap(instructor())),
            )
            .service(
                web::resource("/{exam_id}/questions")
                    // 学生看到的试题不含答案
                    .route(web::get().to(list_questions).wrap(any_member()))
                    .route(web::post().to(create_question).wrap(instructor())),
            )
            .service(
                web::resource("/{exam_id}/questions/{question_id}")
                    .route(web::put().to(update_question).wrap(instructor()))
                    .route(web::delete().to(delete_question).wrap(instructor())),
            )
            .service(
                web::resource("/{exam_id}/attempts")
                    .route(web::get().to(list_attempts).wrap(instructor()))
                    .route(web::post().to(start_attempt).wrap(student())),
            )
            .route(
                "/{exam_id}/attempts/me",
                web::get().to(my_attempts).wrap(any_member()),
            )
            .route(
                "/{exam_id}/attempts/{attempt_id}/submit",
                web::post().to(submit_attempt).wrap(student()),
            ),
    );
}
