use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ScheduleService;
use crate::models::{
    ApiResponse, ErrorCode,
    course_members::entities::CourseRole,
    schedule::{
        entities::ScheduleEvent,
        requests::{CreateEventRequest, ScheduleQuery, UpdateEventRequest},
    },
    users::entities::User,
};
use crate::services::{bad_request, forbidden, internal_error, load_course, not_found};
use crate::storage::Storage;

/// 对事件的访问级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EventAccess {
    None,
    View,
    Manage,
}

// 创建者、管理员和课程讲师可以管理；课程学生只能查看
async fn event_access(
    storage: &dyn Storage,
    user: &User,
    event: &ScheduleEvent,
) -> crate::errors::Result<EventAccess> {
    if user.is_admin() || event.owner_id == user.id {
        return Ok(EventAccess::Manage);
    }
    let Some(course_id) = event.course_id else {
        return Ok(EventAccess::None);
    };

    Ok(match storage.get_course_member(course_id, user.id).await? {
        Some(member) if member.role == CourseRole::Instructor => EventAccess::Manage,
        Some(_) => EventAccess::View,
        None => EventAccess::None,
    })
}

/// 读取事件并检查访问级别，不满足时给出 404 或 403 响应
async fn load_event(
    storage: &dyn Storage,
    user: &User,
    event_id: i64,
    required: EventAccess,
) -> Result<ScheduleEvent, HttpResponse> {
    let event = match storage.get_event(event_id).await {
        Ok(Some(event)) => event,
        Ok(None) => return Err(not_found(ErrorCode::EventNotFound, "Event not found")),
        Err(e) => return Err(internal_error("Failed to retrieve event", e)),
    };

    match event_access(storage, user, &event).await {
        // 无关用户看不到事件的存在
        Ok(EventAccess::None) => Err(not_found(ErrorCode::EventNotFound, "Event not found")),
        Ok(access) if access == required || access == EventAccess::Manage => Ok(event),
        Ok(_) => Err(forbidden(
            ErrorCode::Forbidden,
            "Only the creator or a course instructor can modify this event",
        )),
        Err(e) => Err(internal_error("Failed to check event access", e)),
    }
}

pub async fn list_events(
    service: &ScheduleService,
    user: &User,
    query: ScheduleQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let (from, to) = match query.resolve(chrono::Utc::now()) {
        Ok(range) => range,
        Err(msg) => return Ok(bad_request(ErrorCode::EventInvalid, msg)),
    };

    // 管理员可以看到全部课程事件
    let course_ids = if user.is_admin() {
        None
    } else {
        match storage.list_user_course_ids(user.id).await {
            Ok(ids) => Some(ids),
            Err(e) => return Ok(internal_error("Failed to retrieve schedule", e)),
        }
    };

    match storage
        .list_events_in_range(from, to, course_ids, user.id)
        .await
    {
        Ok(events) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            events,
            "Schedule retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to retrieve schedule", e)),
    }
}

pub async fn create_event(
    service: &ScheduleService,
    user: &User,
    event_data: CreateEventRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if let Err(msg) = event_data.validate() {
        return Ok(bad_request(ErrorCode::EventInvalid, msg));
    }

    if let Some(course_id) = event_data.course_id {
        if let Err(resp) = load_course(storage.as_ref(), course_id).await {
            return Ok(resp);
        }
        if !user.is_admin() {
            match storage.get_course_member(course_id, user.id).await {
                Ok(Some(member)) if member.role == CourseRole::Instructor => {}
                Ok(_) => {
                    return Ok(forbidden(
                        ErrorCode::CoursePermissionDenied,
                        "Only course instructors can create course events",
                    ));
                }
                Err(e) => return Ok(internal_error("Event creation failed", e)),
            }
        }
    }

    match storage.create_event(user.id, event_data).await {
        Ok(event) => Ok(HttpResponse::Created().json(ApiResponse::success(
            event,
            "Event created successfully",
        ))),
        Err(e) => Ok(internal_error("Event creation failed", e)),
    }
}

pub async fn get_event(
    service: &ScheduleService,
    user: &User,
    event_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match load_event(storage.as_ref(), user, event_id, EventAccess::View).await {
        Ok(event) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            event,
            "Event retrieved successfully",
        ))),
        Err(resp) => Ok(resp),
    }
}

pub async fn update_event(
    service: &ScheduleService,
    user: &User,
    event_id: i64,
    update_data: UpdateEventRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let event = match load_event(storage.as_ref(), user, event_id, EventAccess::Manage).await {
        Ok(event) => event,
        Err(resp) => return Ok(resp),
    };

    if let Some(title) = &update_data.title
        && title.trim().is_empty()
    {
        return Ok(bad_request(
            ErrorCode::EventInvalid,
            "Event title must not be empty",
        ));
    }
    let starts_at = update_data.starts_at.unwrap_or(event.starts_at);
    let ends_at = update_data.ends_at.unwrap_or(event.ends_at);
    if ends_at < starts_at {
        return Ok(bad_request(
            ErrorCode::EventInvalid,
            "Event must not end before it starts",
        ));
    }

    match storage.update_event(event_id, update_data).await {
        Ok(Some(event)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            event,
            "Event updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::EventNotFound, "Event not found")),
        Err(e) => Ok(internal_error("Event update failed", e)),
    }
}

pub async fn delete_event(
    service: &ScheduleService,
    user: &User,
    event_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if let Err(resp) = load_event(storage.as_ref(), user, event_id, EventAccess::Manage).await {
        return Ok(resp);
    }

    match storage.delete_event(event_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Event deleted successfully",
        ))),
        Ok(false) => Ok(not_found(ErrorCode::EventNotFound, "Event not found")),
        Err(e) => Ok(internal_error("Event deletion failed", e)),
    }
}
