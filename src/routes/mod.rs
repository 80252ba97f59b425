pub mod assessments;

pub mod auth;

pub mod course_members;

pub mod courses;

pub mod exams;

pub mod forum;

pub mod grades;

pub mod health;

pub mod schedule;

pub mod sessions;

pub mod users;

use actix_web::web;

pub use assessments::configure_assessments_routes;
pub use auth::configure_auth_routes;
pub use course_members::configure_course_members_routes;
pub use courses::configure_courses_routes;
pub use exams::configure_exams_routes;
pub use forum::configure_forum_routes;
pub use grades::configure_grades_routes;
pub use health::configure_health_routes;
pub use schedule::configure_schedule_routes;
pub use sessions::configure_sessions_routes;
pub use users::configure_user_routes;

/// 注册全部 API 路由
///
/// 课程下的子资源 scope 必须先于 `/api/v1/courses` 注册，
/// 否则会被课程 scope 截获而返回 404。
pub fn configure_api_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_health_routes)
        .configure(configure_auth_routes)
        .configure(configure_user_routes)
        .configure(configure_course_members_routes)
        .configure(configure_sessions_routes)
        .configure(configure_assessments_routes)
        .configure(configure_exams_routes)
        .configure(configure_forum_routes)
        .configure(configure_grades_routes)
        .configure(configure_courses_routes)
        .configure(configure_schedule_routes);
}
