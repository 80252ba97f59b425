use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ForumService;
use crate::middlewares::CourseAccess;
use crate::models::{
    ApiResponse, ErrorCode,
    forum::{
        entities::{ForumThread, ThreadKind},
        requests::{CreateThreadRequest, ThreadListParams, UpdateThreadRequest},
    },
};
use crate::services::{bad_request, forbidden, internal_error, load_course, not_found};
use crate::storage::Storage;

/// 读取课程内的主题，不存在时给出 404 响应
pub(crate) async fn load_thread(
    storage: &dyn Storage,
    course_id: i64,
    thread_id: i64,
) -> Result<ForumThread, HttpResponse> {
    match storage.get_thread(course_id, thread_id).await {
        Ok(Some(thread)) => Ok(thread),
        Ok(None) => Err(not_found(ErrorCode::ThreadNotFound, "Thread not found")),
        Err(e) => Err(internal_error("Failed to retrieve thread", e)),
    }
}

pub async fn list_threads(
    service: &ForumService,
    course_id: i64,
    query: ThreadListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage
        .list_threads_with_pagination(course_id, query.into())
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Threads retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to retrieve threads", e)),
    }
}

pub async fn create_thread(
    service: &ForumService,
    course_id: i64,
    access: &CourseAccess,
    thread_data: CreateThreadRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if let Err(msg) = thread_data.validate() {
        return Ok(bad_request(ErrorCode::ThreadInvalid, msg));
    }
    // 公告只能由讲师发布
    if thread_data.kind == Some(ThreadKind::Announcement) && !access.is_instructor() {
        return Ok(forbidden(
            ErrorCode::CoursePermissionDenied,
            "Only instructors can post announcements",
        ));
    }
    if let Err(resp) = load_course(storage.as_ref(), course_id).await {
        return Ok(resp);
    }

    match storage
        .create_thread(course_id, access.user_id(), thread_data)
        .await
    {
        Ok(thread) => Ok(HttpResponse::Created().json(ApiResponse::success(
            thread,
            "Thread created successfully",
        ))),
        Err(e) => Ok(internal_error("Thread creation failed", e)),
    }
}

pub async fn get_thread(
    service: &ForumService,
    course_id: i64,
    thread_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    if let Err(resp) = load_thread(storage.as_ref(), course_id, thread_id).await {
        return Ok(resp);
    }

    match storage.increment_thread_views(thread_id).await {
        Ok(Some(thread)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            thread,
            "Thread retrieved successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::ThreadNotFound, "Thread not found")),
        Err(e) => Ok(internal_error("Failed to retrieve thread", e)),
    }
}

pub async fn update_thread(
    service: &ForumService,
    course_id: i64,
    thread_id: i64,
    access: &CourseAccess,
    update_data: UpdateThreadRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if let Err(msg) = update_data.validate() {
        return Ok(bad_request(ErrorCode::ThreadInvalid, msg));
    }
    let thread = match load_thread(storage.as_ref(), course_id, thread_id).await {
        Ok(thread) => thread,
        Err(resp) => return Ok(resp),
    };
    if thread.user_id != access.user_id() && !access.is_instructor() {
        return Ok(forbidden(
            ErrorCode::Forbidden,
            "Only the author or an instructor can edit this thread",
        ));
    }

    match storage
        .update_thread(course_id, thread_id, update_data)
        .await
    {
        Ok(Some(thread)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            thread,
            "Thread updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::ThreadNotFound, "Thread not found")),
        Err(e) => Ok(internal_error("Thread update failed", e)),
    }
}

pub async fn delete_thread(
    service: &ForumService,
    course_id: i64,
    thread_id: i64,
    access: &CourseAccess,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let thread = match load_thread(storage.as_ref(), course_id, thread_id).await {
        Ok(thread) => thread,
        Err(resp) => return Ok(resp),
    };
    if thread.user_id != access.user_id() && !access.is_instructor() {
        return Ok(forbidden(
            ErrorCode::Forbidden,
            "Only the author or an instructor can delete this thread",
        ));
    }

    match storage.delete_thread(course_id, thread_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Thread deleted successfully",
        ))),
        Ok(false) => Ok(not_found(ErrorCode::ThreadNotFound, "Thread not found")),
        Err(e) => Ok(internal_error("Thread deletion failed", e)),
    }
}
