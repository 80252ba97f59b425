use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, CourseAccess};
use crate::models::assessments::requests::{
    AssessmentListParams, CreateAssessmentRequest, GradeSubmissionRequest,
    SubmitAssessmentRequest, UpdateAssessmentRequest,
};
use crate::models::course_members::entities::CourseRole;
use crate::services::AssessmentService;
use crate::utils::{SafeAssessmentId, SafeCourseId, SafeSubmissionId};

static ASSESSMENT_SERVICE: Lazy<AssessmentService> = Lazy::new(AssessmentService::new_lazy);

pub async fn list_assessments(
    req: HttpRequest,
    course_id: SafeCourseId,
    access: CourseAccess,
    query: web::Query<AssessmentListParams>,
) -> ActixResult<HttpResponse> {
    ASSESSMENT_SERVICE
        .list_assessments(course_id.0, &access, query.into_inner(), &req)
        .await
}

pub async fn create_assessment(
    req: HttpRequest,
    course_id: SafeCourseId,
    access: CourseAccess,
    assessment_data: web::Json<CreateAssessmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSESSMENT_SERVICE
        .create_assessment(course_id.0, &access, assessment_data.into_inner(), &req)
        .await
}

pub async fn get_assessment(
    req: HttpRequest,
    course_id: SafeCourseId,
    assessment_id: SafeAssessmentId,
    access: CourseAccess,
) -> ActixResult<HttpResponse> {
    ASSESSMENT_SERVICE
        .get_assessment(course_id.0, assessment_id.0, &access, &req)
        .await
}

pub async fn update_assessment(
    req: HttpRequest,
    course_id: SafeCourseId,
    assessment_id: SafeAssessmentId,
    update_data: web::Json<UpdateAssessmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSESSMENT_SERVICE
        .update_assessment(course_id.0, assessment_id.0, update_data.into_inner(), &req)
        .await
}

pub async fn delete_assessment(
    req: HttpRequest,
    course_id: SafeCourseId,
    assessment_id: SafeAssessmentId,
) -> ActixResult<HttpResponse> {
    ASSESSMENT_SERVICE
        .delete_assessment(course_id.0, assessment_id.0, &req)
        .await
}

pub async fn submit(
    req: HttpRequest,
    course_id: SafeCourseId,
    assessment_id: SafeAssessmentId,
    access: CourseAccess,
    submit_data: web::Json<SubmitAssessmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSESSMENT_SERVICE
        .submit(
            course_id.0,
            assessment_id.0,
            &access,
            submit_data.into_inner(),
            &req,
        )
        .await
}

pub async fn list_submissions(
    req: HttpRequest,
    course_id: SafeCourseId,
    assessment_id: SafeAssessmentId,
) -> ActixResult<HttpResponse> {
    ASSESSMENT_SERVICE
        .list_submissions(course_id.0, assessment_id.0, &req)
        .await
}

pub async fn my_submissions(
    req: HttpRequest,
    course_id: SafeCourseId,
    assessment_id: SafeAssessmentId,
    access: CourseAccess,
) -> ActixResult<HttpResponse> {
    ASSESSMENT_SERVICE
        .my_submissions(course_id.0, assessment_id.0, &access, &req)
        .await
}

pub async fn grade_submission(
    req: HttpRequest,
    course_id: SafeCourseId,
    assessment_id: SafeAssessmentId,
    submission_id: SafeSubmissionId,
    access: CourseAccess,
    grade_data: web::Json<GradeSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    ASSESSMENT_SERVICE
        .grade_submission(
            course_id.0,
            assessment_id.0,
            submission_id.0,
            &access,
            grade_data.into_inner(),
            &req,
        )
        .await
}

fn any_member() -> middlewares::RequireCourseRole {
    middlewares::RequireCourseRole::new_any(CourseRole::all_roles())
}

fn instructor() -> middlewares::RequireCourseRole {
    middlewares::RequireCourseRole::new(&CourseRole::Instructor)
}

pub fn configure_assessments_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/courses/{course_id}/assessments")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_assessments).wrap(any_member()))
                    .route(web::post().to(create_assessment).wrap(instructor())),
            )
            .service(
                web::resource("/{assessment_id}")
                    .route(web::get().to(get_assessment).wrap(any_member()))
                    .route(web::put().to(update_assessment).wrap(instructor()))
                    .route(web::delete().to(delete_assessment).wrap(instructor())),
            )
            .service(
                web::resource("/{assessment_id}/submissions")
                    .route(web::get().to(list_submissions).wrap(instructor()))
                    .route(
                        web::post()
                            .to(submit)
                            .wrap(middlewares::RequireCourseRole::new(&CourseRole::Student)),
                    ),
            )
            .route(
                "/{assessment_id}/submissions/me",
                web::get().to(my_submissions).wrap(any_member()),
            )
            .route(
                "/{assessment_id}/submissions/{submission_id}/grade",
                web::put().to(grade_submission).wrap(instructor()),
            ),
    );
}
