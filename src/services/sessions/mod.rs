pub mod attendance;
pub mod create;
pub mod delete;
pub mod get;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::CourseAccess;
use crate::models::sessions::requests::{
    CheckInRequest, CreateSessionRequest, MarkAttendanceRequest, UpdateSessionRequest,
};
use crate::services::define_service;

define_service!(SessionService);

impl SessionService {
    pub async fn list_sessions(
        &self,
        course_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::list_sessions(self, course_id, request).await
    }

    pub async fn create_session(
        &self,
        course_id: i64,
        session_data: CreateSessionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_session(self, course_id, session_data, request).await
    }

    pub async fn get_session(
        &self,
        course_id: i64,
        session_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_session(self, course_id, session_id, request).await
    }

    pub async fn update_session(
        &self,
        course_id: i64,
        session_id: i64,
        update_data: UpdateSessionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_session(self, course_id, session_id, update_data, request).await
    }

    pub async fn delete_session(
        &self,
        course_id: i64,
        session_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_session(self, course_id, session_id, request).await
    }

    // 课次全部考勤记录
    pub async fn list_attendance(
        &self,
        course_id: i64,
        session_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        attendance::list_attendance(self, course_id, session_id, request).await
    }

    // 教师标记考勤
    pub async fn mark_attendance(
        &self,
        course_id: i64,
        session_id: i64,
        access: &CourseAccess,
        mark_data: MarkAttendanceRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        attendance::mark_attendance(self, course_id, session_id, access, mark_data, request).await
    }

    // 学生自助签到
    pub async fn check_in(
        &self,
        course_id: i64,
        session_id: i64,
        access: &CourseAccess,
        check_in_data: CheckInRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        attendance::check_in(self, course_id, session_id, access, check_in_data, request).await
    }

    pub async fn my_attendance(
        &self,
        course_id: i64,
        access: &CourseAccess,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        attendance::my_attendance(self, course_id, access, request).await
    }
}
