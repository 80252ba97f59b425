pub mod events;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::schedule::requests::{CreateEventRequest, ScheduleQuery, UpdateEventRequest};
use crate::models::users::entities::User;
use crate::services::define_service;

define_service!(ScheduleService);

impl ScheduleService {
    pub async fn list_events(
        &self,
        user: &User,
        query: ScheduleQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        events::list_events(self, user, query, request).await
    }

    pub async fn create_event(
        &self,
        user: &User,
        event_data: CreateEventRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        events::create_event(self, user, event_data, request).await
    }

    pub async fn get_event(
        &self,
        user: &User,
        event_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        events::get_event(self, user, event_id, request).await
    }

    pub async fn update_event(
        &self,
        user: &User,
        event_id: i64,
        update_data: UpdateEventRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        events::update_event(self, user, event_id, update_data, request).await
    }

    pub async fn delete_event(
        &self,
        user: &User,
        event_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        events::delete_event(self, user, event_id, request).await
    }
}

#[cfg(test)]
mod tests {
    use crate::models::course_members::{entities::CourseRole, requests::AddMemberRequest};
    use crate::models::courses::requests::CreateCourseRequest;
    use crate::models::users::entities::{User, UserProfile, UserRole};
    use crate::models::users::requests::CreateUserRequest;
    use crate::routes::configure_schedule_routes;
    use crate::storage::{Storage, sea_orm_storage::SeaOrmStorage};
    use crate::utils::jwt::JwtUtils;
    use actix_web::{App, test, web};
    use chrono::{Duration, Utc};
    use std::sync::Arc;

    async fn seed_user(storage: &dyn Storage, username: &str, role: UserRole) -> User {
        storage
            .create_user(CreateUserRequest {
                username: username.into(),
                email: format!("{username}@example.com"),
                password: "hash".into(),
                role,
                profile: UserProfile::default(),
            })
            .await
            .unwrap()
    }

    fn bearer(user: &User) -> (&'static str, String) {
        let token = JwtUtils::generate_access_token(user.id, &user.role).unwrap();
        ("Authorization", format!("Bearer {token}"))
    }

    #[actix_web::test]
    async fn test_course_and_personal_events() {
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::in_memory().await);
        let lecturer = seed_user(storage.as_ref(), "lecturer1", UserRole::Instructor).await;
        let student = seed_user(storage.as_ref(), "student1", UserRole::Student).await;
        let stranger = seed_user(storage.as_ref(), "student2", UserRole::Student).await;
        let course = storage
            .create_course(CreateCourseRequest {
                code: "PH101".into(),
                title: "Physics".into(),
                category: None,
                description: None,
                semester: "fall".into(),
                year: 2026,
            })
            .await
            .unwrap();
        for (user_id, role) in [
            (lecturer.id, CourseRole::Instructor),
            (student.id, CourseRole::Student),
        ] {
            storage
                .add_course_member(
                    course.id,
                    AddMemberRequest {
                        user_id,
                        role,
                        is_main: false,
                    },
                )
                .await
                .unwrap();
        }

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage.clone()))
                .configure(configure_schedule_routes),
        )
        .await;
        let starts_at = Utc::now() + Duration::days(1);
        let ends_at = starts_at + Duration::hours(2);

        // 学生不能创建课程事件
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/schedule")
                .insert_header(bearer(&student))
                .set_json(serde_json::json!({
                    "course_id": course.id,
                    "title": "Lab",
                    "starts_at": starts_at,
                    "ends_at": ends_at
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 403);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/schedule")
                .insert_header(bearer(&lecturer))
                .set_json(serde_json::json!({
                    "course_id": course.id,
                    "kind": "lecture",
                    "title": "Lecture 1",
                    "starts_at": starts_at,
                    "ends_at": ends_at
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 201);
        let body: serde_json::Value = test::read_body_json(resp).await;
        let lecture_id = body["data"]["id"].as_i64().unwrap();

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/schedule")
                .insert_header(bearer(&student))
                .set_json(serde_json::json!({
                    "title": "Study group",
                    "starts_at": starts_at,
                    "ends_at": ends_at
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 201);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["kind"], "personal");

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/schedule")
                .insert_header(bearer(&student))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 200);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 2);

        // 非课程成员既看不到也改不了课程事件
        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/schedule")
                .insert_header(bearer(&stranger))
                .to_request(),
        )
        .await;
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 0);

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/api/v1/schedule/{lecture_id}"))
                .insert_header(bearer(&stranger))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 404);

        let resp = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&format!("/api/v1/schedule/{lecture_id}"))
                .insert_header(bearer(&student))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 403);

        let resp = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&format!("/api/v1/schedule/{lecture_id}"))
                .insert_header(bearer(&lecturer))
                .set_json(serde_json::json!({ "ends_at": starts_at - Duration::hours(1) }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 400);
    }
}
