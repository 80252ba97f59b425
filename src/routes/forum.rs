use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, CourseAccess};
use crate::models::course_members::entities::CourseRole;
use crate::models::forum::requests::{
    CreateMessageRequest, CreateThreadRequest, ThreadListParams, UpdateMessageRequest,
    UpdateThreadRequest,
};
use crate::services::ForumService;
use crate::utils::{SafeCourseId, SafeMessageId, SafeThreadId};

static FORUM_SERVICE: Lazy<ForumService> = Lazy::new(ForumService::new_lazy);

pub async fn list_threads(
    req: HttpRequest,
    course_id: SafeCourseId,
    query: web::Query<ThreadListParams>,
) -> ActixResult<HttpResponse> {
    FORUM_SERVICE
        .list_threads(course_id.0, query.into_inner(), &req)
        .await
}

pub async fn create_thread(
    req: HttpRequest,
    course_id: SafeCourseId,
    access: CourseAccess,
    thread_data: web::Json<CreateThreadRequest>,
) -> ActixResult<HttpResponse> {
    FORUM_SERVICE
        .create_thread(course_id.0, &access, thread_data.into_inner(), &req)
        .await
}

pub async fn get_thread(
    req: HttpRequest,
    course_id: SafeCourseId,
    thread_id: SafeThreadId,
) -> ActixResult<HttpResponse> {
    FORUM_SERVICE
        .get_thread(course_id.0, thread_id.0, &req)
        .await
}

pub async fn update_thread(
    req: HttpRequest,
    course_id: SafeCourseId,
    thread_id: SafeThreadId,
    access: CourseAccess,
    update_data: web::Json<UpdateThreadRequest>,
) -> ActixResult<HttpResponse> {
    FORUM_SERVICE
        .update_thread(
            course_id.0,
            thread_id.0,
            &access,
            update_data.into_inner(),
            &req,
        )
        .await
}

pub async fn delete_thread(
    req: HttpRequest,
    course_id: SafeCourseId,
    thread_id: SafeThreadId,
    access: CourseAccess,
) -> ActixResult<HttpResponse> {
    FORUM_SERVICE
        .delete_thread(course_id.0, thread_id.0, &access, &req)
        .await
}

pub async fn list_messages(
    req: HttpRequest,
    course_id: SafeCourseId,
    thread_id: SafeThreadId,
) -> ActixResult<HttpResponse> {
    FORUM_SERVICE
        .list_messages(course_id.0, thread_id.0, &req)
        .await
}

pub async fn create_message(
    req: HttpRequest,
    course_id: SafeCourseId,
    thread_id: SafeThreadId,
    access: CourseAccess,
    message_data: web::Json<CreateMessageRequest>,
) -> ActixResult<HttpResponse> {
    FORUM_SERVICE
        .create_message(
            course_id.0,
            thread_id.0,
            &access,
            message_data.into_inner(),
            &req,
        )
        .await
}

pub async fn update_message(
    req: HttpRequest,
    course_id: SafeCourseId,
    thread_id: SafeThreadId,
    message_id: SafeMessageId,
    access: CourseAccess,
    update_data: web::Json<UpdateMessageRequest>,
) -> ActixResult<HttpResponse> {
    FORUM_SERVICE
        .update_message(
            course_id.0,
            thread_id.0,
            message_id.0,
            &access,
            update_data.into_inner(),
            &req,
        )
        .await
}

pub async fn delete_message(
    req: HttpRequest,
    course_id: SafeCourseId,
    thread_id: SafeThreadId,
    message_id: SafeMessageId,
    access: CourseAccess,
) -> ActixResult<HttpResponse> {
    FORUM_SERVICE
        .delete_message(course_id.0, thread_id.0, message_id.0, &access, &req)
        .await
}

// 论坛对全部课程成员开放，作者与讲师的区分在服务层完成
fn any_member() -> middlewares::RequireCourseRole {
    middlewares::RequireCourseRole::new_any(CourseRole::all_roles())
}

pub fn configure_forum_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/courses/{course_id}/forum/threads")
            // 后注册的中间件先执行，JWT 必须在外层
            .wrap(any_member())
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_threads))
                    .route(web::post().to(create_thread)),
            )
            .service(
                web::resource("/{thread_id}")
                    .route(web::get().to(get_thread))
                    .route(web::put().to(update_thread))
                    .route(web::delete().to(delete_thread)),
            )
            .service(
                web::resource("/{thread_id}/messages")
                    .route(web::get().to(list_messages))
                    .route(web::post().to(create_message)),
            )
            .service(
                web::resource("/{thread_id}/messages/{message_id}")
                    .route(web::put().to(update_message))
                    .route(web::delete().to(delete_message)),
            ),
    );
}
