use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, CourseAccess};
use crate::models::course_members::entities::CourseRole;
use crate::models::grades::requests::OverrideGradeRequest;
use crate::services::GradeService;
use crate::utils::{SafeCourseId, SafeUserId};

static GRADE_SERVICE: Lazy<GradeService> = Lazy::new(GradeService::new_lazy);

pub async fn list_course_grades(
    req: HttpRequest,
    course_id: SafeCourseId,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.list_course_grades(course_id.0, &req).await
}

pub async fn calculate_grades(
    req: HttpRequest,
    course_id: SafeCourseId,
    access: CourseAccess,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE
        .calculate_grades(course_id.0, &access, &req)
        .await
}

pub async fn override_grade(
    req: HttpRequest,
    course_id: SafeCourseId,
    user_id: SafeUserId,
    access: CourseAccess,
    override_data: web::Json<OverrideGradeRequest>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE
        .override_grade(
            course_id.0,
            user_id.0,
            &access,
            override_data.into_inner(),
            &req,
        )
        .await
}

pub async fn delete_grade(
    req: HttpRequest,
    course_id: SafeCourseId,
    user_id: SafeUserId,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE
        .delete_grade(course_id.0, user_id.0, &req)
        .await
}

pub async fn my_course_grade(
    req: HttpRequest,
    course_id: SafeCourseId,
    access: CourseAccess,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE
        .my_course_grade(course_id.0, &access, &req)
        .await
}

pub async fn my_grades(req: HttpRequest) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.my_grades(&req).await
}

fn any_member() -> middlewares::RequireCourseRole {
    middlewares::RequireCourseRole::new_any(CourseRole::all_roles())
}

fn instructor() -> middlewares::RequireCourseRole {
    middlewares::RequireCourseRole::new(&CourseRole::Instructor)
}

pub fn configure_grades_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/courses/{course_id}/grades")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_course_grades).wrap(instructor()))
            .route(
                "/calculate",
                web::post().to(calculate_grades).wrap(instructor()),
            )
            // /me 必须在 /{user_id} 之前注册
            .route("/me", web::get().to(my_course_grade).wrap(any_member()))
            .service(
                web::resource("/{user_id}")
                    .route(web::put().to(override_grade).wrap(instructor()))
                    .route(web::delete().to(delete_grade).wrap(instructor())),
            ),
    )
    .service(
        web::scope("/api/v1/grades")
            .wrap(middlewares::RequireJWT)
            .route("/me", web::get().to(my_grades)),
    );
}
