pub mod rate_limit;
pub mod request_logger;
pub mod require_course_role;
pub mod require_jwt;
pub mod require_role;

pub use rate_limit::RateLimit;
pub use request_logger::RequestLogger;
pub use require_course_role::{CourseAccess, RequireCourseRole};
pub use require_jwt::{CurrentUser, RequireJWT};
pub use require_role::RequireRole;

use actix_web::{HttpResponse, http::StatusCode, http::header::CONTENT_TYPE};

use crate::models::{ApiResponse, ErrorCode};

// 中间件统一的错误响应，204 不带响应体
pub(crate) fn create_error_response(
    status: StatusCode,
    code: ErrorCode,
    message: &str,
) -> HttpResponse {
    if status == StatusCode::NO_CONTENT {
        return HttpResponse::build(status).finish();
    }

    HttpResponse::build(status)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .json(ApiResponse::error_empty(code, message))
}
