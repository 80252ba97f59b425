use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SessionService;
use super::get::load_session;
use crate::middlewares::CourseAccess;
use crate::models::{
    ApiResponse, ErrorCode,
    course_members::entities::CourseRole,
    sessions::{
        entities::AttendanceSummary,
        requests::{AttendanceUpsert, CheckInRequest, MarkAttendanceRequest},
        responses::MyAttendanceResponse,
    },
};
use crate::services::{bad_request, conflict, forbidden, internal_error};

pub async fn list_attendance(
    service: &SessionService,
    course_id: i64,
    session_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    if let Err(resp) = load_session(storage.as_ref(), course_id, session_id).await {
        return Ok(resp);
    }

    match storage.list_session_attendance(session_id).await {
        Ok(records) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            records,
            "Attendance retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to retrieve attendance", e)),
    }
}

pub async fn mark_attendance(
    service: &SessionService,
    course_id: i64,
    session_id: i64,
    access: &CourseAccess,
    mark_data: MarkAttendanceRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    if let Err(resp) = load_session(storage.as_ref(), course_id, session_id).await {
        return Ok(resp);
    }

    // 只能给本课程的学生记考勤
    match storage.get_course_member(course_id, mark_data.user_id).await {
        Ok(Some(member)) if member.role == CourseRole::Student => {}
        Ok(_) => {
            return Ok(bad_request(
                ErrorCode::AttendanceTargetInvalid,
                "Attendance can only be marked for students of this course",
            ));
        }
        Err(e) => return Ok(internal_error("Failed to mark attendance", e)),
    }

    let record = AttendanceUpsert {
        session_id,
        user_id: mark_data.user_id,
        status: mark_data.status,
        comment: mark_data.comment,
        checked_in_at: None,
        marked_by: Some(access.user_id()),
    };

    match storage.upsert_attendance(record).await {
        Ok(attendance) => {
            info!(
                "Attendance for user {} in session {session_id} marked {}",
                attendance.user_id, attendance.status
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                attendance,
                "Attendance marked successfully",
            )))
        }
        Err(e) => Ok(internal_error("Failed to mark attendance", e)),
    }
}

pub async fn check_in(
    service: &SessionService,
    course_id: i64,
    session_id: i64,
    access: &CourseAccess,
    check_in_data: CheckInRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if !access.is_student() {
        return Ok(forbidden(
            ErrorCode::AttendanceNotAllowed,
            "Only students of this course can check in",
        ));
    }

    let session = match load_session(storage.as_ref(), course_id, session_id).await {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };

    let now = chrono::Utc::now();
    let Some(status) = session.check_in_status_at(now) else {
        return Ok(bad_request(
            ErrorCode::AttendanceNotAllowed,
            "Check-in is not open for this session",
        ));
    };

    let user_id = access.user_id();
    match storage.get_attendance(session_id, user_id).await {
        Ok(Some(_)) => {
            return Ok(conflict(
                ErrorCode::AttendanceNotAllowed,
                "Attendance already recorded for this session",
            ));
        }
        Ok(None) => {}
        Err(e) => return Ok(internal_error("Check-in failed", e)),
    }

    let record = AttendanceUpsert {
        session_id,
        user_id,
        status,
        comment: check_in_data.comment,
        checked_in_at: Some(now),
        marked_by: None,
    };

    match storage.upsert_attendance(record).await {
        Ok(attendance) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            attendance,
            "Checked in successfully",
        ))),
        Err(e) => Ok(internal_error("Check-in failed", e)),
    }
}

pub async fn my_attendance(
    service: &SessionService,
    course_id: i64,
    access: &CourseAccess,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage
        .list_user_course_attendance(course_id, access.user_id())
        .await
    {
        Ok(records) => {
            let summary = AttendanceSummary::from_records(&records);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                MyAttendanceResponse { records, summary },
                "Attendance retrieved successfully",
            )))
        }
        Err(e) => Ok(internal_error("Failed to retrieve attendance", e)),
    }
}
