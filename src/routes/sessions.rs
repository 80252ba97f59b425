use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, CourseAccess};
use crate::models::course_members::entities::CourseRole;
use crate::models::sessions::requests::{
    CheckInRequest, CreateSessionRequest, MarkAttendanceRequest, UpdateSessionRequest,
};
use crate::services::SessionService;
use crate::utils::{SafeCourseId, SafeSessionId};

static SESSION_SERVICE: Lazy<SessionService> = Lazy::new(SessionService::new_lazy);

pub async fn list_sessions(
    req: HttpRequest,
    course_id: SafeCourseId,
) -> ActixResult<HttpResponse> {
    SESSION_SERVICE.list_sessions(course_id.0, &req).await
}

pub async fn create_session(
    req: HttpRequest,
    course_id: SafeCourseId,
    session_data: web::Json<CreateSessionRequest>,
) -> ActixResult<HttpResponse> {
    SESSION_SERVICE
        .create_session(course_id.0, session_data.into_inner(), &req)
        .await
}

pub async fn get_session(
    req: HttpRequest,
    course_id: SafeCourseId,
    session_id: SafeSessionId,
) -> ActixResult<HttpResponse> {
    SESSION_SERVICE
        .get_session(course_id.0, session_id.0, &req)
        .await
}

pub async fn update_session(
    req: HttpRequest,
    course_id: SafeCourseId,
    session_id: SafeSessionId,
    update_data: web::Json<UpdateSessionRequest>,
) -> ActixResult<HttpResponse> {
    SESSION_SERVICE
        .update_session(course_id.0, session_id.0, update_data.into_inner(), &req)
        .await
}

pub async fn delete_session(
    req: HttpRequest,
    course_id: SafeCourseId,
    session_id: SafeSessionId,
) -> ActixResult<HttpResponse> {
    SESSION_SERVICE
        .delete_session(course_id.0, session_id.0, &req)
        .await
}

pub async fn list_attendance(
    req: HttpRequest,
    course_id: SafeCourseId,
    session_id: SafeSessionId,
) -> ActixResult<HttpResponse> {
    SESSION_SERVICE
        .list_attendance(course_id.0, session_id.0, &req)
        .await
}

pub async fn mark_attendance(
    req: HttpRequest,
    course_id: SafeCourseId,
    session_id: SafeSessionId,
    access: CourseAccess,
    mark_data: web::Json<MarkAttendanceRequest>,
) -> ActixResult<HttpResponse> {
    SESSION_SERVICE
        .mark_attendance(course_id.0, session_id.0, &access, mark_data.into_inner(), &req)
        .await
}

pub async fn check_in(
    req: HttpRequest,
    course_id: SafeCourseId,
    session_id: SafeSessionId,
    access: CourseAccess,
    body: Option<web::Json<CheckInRequest>>,
) -> ActixResult<HttpResponse> {
    let body = body.map(web::Json::into_inner).unwrap_or_default();
    SESSION_SERVICE
        .check_in(course_id.0, session_id.0, &access, body, &req)
        .await
}

pub async fn my_attendance(
    req: HttpRequest,
    course_id: SafeCourseId,
    access: CourseAccess,
) -> ActixResult<HttpResponse> {
    SESSION_SERVICE
        .my_attendance(course_id.0, &access, &req)
        .await
}

fn any_member() -> middlewares::RequireCourseRole {
    middlewares::RequireCourseRole::new_any(CourseRole::all_roles())
}

fn instructor() -> middlewares::RequireCourseRole {
    middlewares::RequireCourseRole::new(&CourseRole::Instructor)
}

pub fn configure_sessions_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/courses/{course_id}/sessions")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_sessions).wrap(any_member()))
                    .route(web::post().to(create_session).wrap(instructor())),
            )
            .service(
                web::resource("/{session_id}")
                    .route(web::get().to(get_session).wrap(any_member()))
                    .route(web::put().to(update_session).wrap(instructor()))
                    .route(web::delete().to(delete_session).wrap(instructor())),
            )
            .service(
                web::resource("/{session_id}/attendance")
                    .route(web::get().to(list_attendance).wrap(instructor()))
                    .route(web::post().to(mark_attendance).wrap(instructor())),
            )
            .service(
                web::resource("/{session_id}/attendance/check-in")
                    .route(web::post().to(check_in).wrap(any_member())),
            ),
    );
    cfg.service(
        web::scope("/api/v1/courses/{course_id}/attendance")
            .wrap(middlewares::RequireJWT)
            .route("/me", web::get().to(my_attendance).wrap(any_member())),
    );
}
