use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ForumService;
use super::threads::load_thread;
use crate::middlewares::CourseAccess;
use crate::models::{
    ApiResponse, ErrorCode,
    forum::{
        entities::ThreadStatus,
        requests::{CreateMessageRequest, UpdateMessageRequest},
    },
};
use crate::services::{bad_request, forbidden, internal_error, not_found};

pub async fn list_messages(
    service: &ForumService,
    course_id: i64,
    thread_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    if let Err(resp) = load_thread(storage.as_ref(), course_id, thread_id).await {
        return Ok(resp);
    }

    match storage.list_messages(thread_id).await {
        Ok(messages) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            messages,
            "Messages retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to retrieve messages", e)),
    }
}

pub async fn create_message(
    service: &ForumService,
    course_id: i64,
    thread_id: i64,
    access: &CourseAccess,
    message_data: CreateMessageRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if message_data.content.trim().is_empty() {
        return Ok(bad_request(
            ErrorCode::MessageInvalid,
            "Message content must not be empty",
        ));
    }

    let thread = match load_thread(storage.as_ref(), course_id, thread_id).await {
        Ok(thread) => thread,
        Err(resp) => return Ok(resp),
    };
    if thread.status == ThreadStatus::Closed {
        return Ok(bad_request(ErrorCode::ThreadClosed, "Thread is closed"));
    }

    // 回复的父消息必须在同一主题内
    if let Some(parent_id) = message_data.parent_id {
        match storage.get_message(thread_id, parent_id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Ok(bad_request(
                    ErrorCode::MessageInvalid,
                    "Parent message does not belong to this thread",
                ));
            }
            Err(e) => return Ok(internal_error("Failed to post message", e)),
        }
    }

    match storage
        .create_message(thread_id, access.user_id(), message_data)
        .await
    {
        Ok(message) => Ok(HttpResponse::Created().json(ApiResponse::success(
            message,
            "Message posted successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to post message", e)),
    }
}

pub async fn update_message(
    service: &ForumService,
    course_id: i64,
    thread_id: i64,
    message_id: i64,
    access: &CourseAccess,
    update_data: UpdateMessageRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if update_data.content.trim().is_empty() {
        return Ok(bad_request(
            ErrorCode::MessageInvalid,
            "Message content must not be empty",
        ));
    }
    if let Err(resp) = load_thread(storage.as_ref(), course_id, thread_id).await {
        return Ok(resp);
    }

    match storage.get_message(thread_id, message_id).await {
        Ok(Some(message)) if message.user_id == access.user_id() => {}
        Ok(Some(_)) => {
            return Ok(forbidden(
                ErrorCode::Forbidden,
                "Only the author can edit this message",
            ));
        }
        Ok(None) => return Ok(not_found(ErrorCode::MessageNotFound, "Message not found")),
        Err(e) => return Ok(internal_error("Message update failed", e)),
    }

    match storage
        .update_message(thread_id, message_id, update_data.content)
        .await
    {
        Ok(Some(message)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            message,
            "Message updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::MessageNotFound, "Message not found")),
        Err(e) => Ok(internal_error("Message update failed", e)),
    }
}

pub async fn delete_message(
    service: &ForumService,
    course_id: i64,
    thread_id: i64,
    message_id: i64,
    access: &CourseAccess,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    if let Err(resp) = load_thread(storage.as_ref(), course_id, thread_id).await {
        return Ok(resp);
    }

    match storage.get_message(thread_id, message_id).await {
        Ok(Some(message)) if message.user_id == access.user_id() || access.is_instructor() => {}
        Ok(Some(_)) => {
            return Ok(forbidden(
                ErrorCode::Forbidden,
                "Only the author or an instructor can delete this message",
            ));
        }
        Ok(None) => return Ok(not_found(ErrorCode::MessageNotFound, "Message not found")),
        Err(e) => return Ok(internal_error("Message deletion failed", e)),
    }

    match storage.delete_message(thread_id, message_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Message deleted successfully",
        ))),
        Ok(false) => Ok(not_found(ErrorCode::MessageNotFound, "Message not found")),
        Err(e) => Ok(internal_error("Message deletion failed", e)),
    }
}
