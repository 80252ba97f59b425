use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, CourseAccess};
use crate::models::course_members::entities::CourseRole;
use crate::models::course_members::requests::{
    AddMemberRequest, MemberListParams, UpdateMemberRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::CourseMemberService;
use crate::utils::{SafeCourseId, SafeUserId};

static COURSE_MEMBER_SERVICE: Lazy<CourseMemberService> =
    Lazy::new(CourseMemberService::new_lazy);

pub async fn list_members(
    req: HttpRequest,
    course_id: SafeCourseId,
    query: web::Query<MemberListParams>,
) -> ActixResult<HttpResponse> {
    COURSE_MEMBER_SERVICE
        .list_members(course_id.0, query.into_inner(), &req)
        .await
}

pub async fn add_member(
    req: HttpRequest,
    course_id: SafeCourseId,
    access: CourseAccess,
    member_data: web::Json<AddMemberRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_MEMBER_SERVICE
        .add_member(course_id.0, &access, member_data.into_inner(), &req)
        .await
}

pub async fn update_member(
    req: HttpRequest,
    course_id: SafeCourseId,
    user_id: SafeUserId,
    update_data: web::Json<UpdateMemberRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_MEMBER_SERVICE
        .update_member(course_id.0, user_id.0, update_data.into_inner(), &req)
        .await
}

pub async fn remove_member(
    req: HttpRequest,
    course_id: SafeCourseId,
    user_id: SafeUserId,
    access: CourseAccess,
) -> ActixResult<HttpResponse> {
    COURSE_MEMBER_SERVICE
        .remove_member(course_id.0, user_id.0, &access, &req)
        .await
}

pub fn configure_course_members_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/courses/{course_id}/members")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(
                        web::get()
                            .to(list_members)
                            .wrap(middlewares::RequireCourseRole::new_any(CourseRole::all_roles())),
                    )
                    .route(
                        web::post()
                            .to(add_member)
                            // 课程讲师只能添加学生，由服务层判断
                            .wrap(middlewares::RequireCourseRole::new(&CourseRole::Instructor)),
                    ),
            )
            .service(
                web::resource("/{user_id}")
                    .route(
                        web::put()
                            .to(update_member)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    )
                    .route(
                        web::delete()
                            .to(remove_member)
                            .wrap(middlewares::RequireCourseRole::new(&CourseRole::Instructor)),
                    ),
            ),
    );
}
