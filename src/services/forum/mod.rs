pub mod messages;
pub mod threads;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::CourseAccess;
use crate::models::forum::requests::{
    CreateMessageRequest, CreateThreadRequest, ThreadListParams, UpdateMessageRequest,
    UpdateThreadRequest,
};
use crate::services::define_service;

define_service!(ForumService);

impl ForumService {
    pub async fn list_threads(
        &self,
        course_id: i64,
        query: ThreadListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        threads::list_threads(self, course_id, query, request).await
    }

    pub async fn create_thread(
        &self,
        course_id: i64,
        access: &CourseAccess,
        thread_data: CreateThreadRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        threads::create_thread(self, course_id, access, thread_data, request).await
    }

    // 查看主题，浏览数加一
    pub async fn get_thread(
        &self,
        course_id: i64,
        thread_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        threads::get_thread(self, course_id, thread_id, request).await
    }

    pub async fn update_thread(
        &self,
        course_id: i64,
        thread_id: i64,
        access: &CourseAccess,
        update_data: UpdateThreadRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        threads::update_thread(self, course_id, thread_id, access, update_data, request).await
    }

    pub async fn delete_thread(
        &self,
        course_id: i64,
        thread_id: i64,
        access: &CourseAccess,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        threads::delete_thread(self, course_id, thread_id, access, request).await
    }

    pub async fn list_messages(
        &self,
        course_id: i64,
        thread_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        messages::list_messages(self, course_id, thread_id, request).await
    }

    pub async fn create_message(
        &self,
        course_id: i64,
        thread_id: i64,
        access: &CourseAccess,
        message_data: CreateMessageRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        messages::create_message(self, course_id, thread_id, access, message_data, request).await
    }

    pub async fn update_message(
        &self,
        course_id: i64,
        thread_id: i64,
        message_id: i64,
        access: &CourseAccess,
        update_data: UpdateMessageRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        messages::update_message(
            self,
            course_id,
            thread_id,
            message_id,
            access,
            update_data,
            request,
        )
        .await
    }

    pub async fn delete_message(
        &self,
        course_id: i64,
        thread_id: i64,
        message_id: i64,
        access: &CourseAccess,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        messages::delete_message(self, course_id, thread_id, message_id, access, request).await
    }
}

#[cfg(test)]
mod tests {
    use crate::models::course_members::{entities::CourseRole, requests::AddMemberRequest};
    use crate::models::courses::requests::CreateCourseRequest;
    use crate::models::users::entities::{User, UserProfile, UserRole};
    use crate::models::users::requests::CreateUserRequest;
    use crate::routes::configure_forum_routes;
    use crate::storage::{Storage, sea_orm_storage::SeaOrmStorage};
    use crate::utils::jwt::JwtUtils;
    use actix_web::{App, test, web};
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

    fn body_json(bytes: &[u8]) -> serde_json::Value {
        serde_json::from_slice(bytes).unwrap()
    }

    #[actix_web::test]
    async fn test_thread_lifecycle_and_closed_thread() {
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::in_memory().await);
        let lecturer = seed_user(storage.as_ref(), "lecturer1", UserRole::Instructor).await;
        let student = seed_user(storage.as_ref(), "student1", UserRole::Student).await;
        let outsider = seed_user(storage.as_ref(), "student2", UserRole::Student).await;
        let course = storage
            .create_course(CreateCourseRequest {
                code: "CS201".into(),
                title: "Data Structures".into(),
                category: None,
                description: None,
                semester: "spring".into(),
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
                .configure(configure_forum_routes),
        )
        .await;
        let base = format!("/api/v1/courses/{}/forum/threads", course.id);

        // 非成员无法访问
        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&base)
                .insert_header(bearer(&outsider))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 403);

        // 学生不能发布公告
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&base)
                .insert_header(bearer(&student))
                .set_json(serde_json::json!({
                    "title": "Heads up",
                    "content": "Exam moved",
                    "kind": "announcement"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 403);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&base)
                .insert_header(bearer(&student))
                .set_json(serde_json::json!({
                    "title": "Homework 2",
                    "content": "Is question 3 optional?",
                    "kind": "question"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 201);
        let thread_id = body_json(&test::read_body(resp).await)["data"]["id"]
            .as_i64()
            .unwrap();

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("{base}/{thread_id}"))
                .insert_header(bearer(&lecturer))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 200);
        assert_eq!(body_json(&test::read_body(resp).await)["data"]["views"], 1);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("{base}/{thread_id}/messages"))
                .insert_header(bearer(&lecturer))
                .set_json(serde_json::json!({ "content": "Yes, it is optional." }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 201);
        let message_id = body_json(&test::read_body(resp).await)["data"]["id"]
            .as_i64()
            .unwrap();

        // 只有作者本人可以编辑消息
        let resp = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&format!("{base}/{thread_id}/messages/{message_id}"))
                .insert_header(bearer(&student))
                .set_json(serde_json::json!({ "content": "edited" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 403);

        let resp = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&format!("{base}/{thread_id}"))
                .insert_header(bearer(&lecturer))
                .set_json(serde_json::json!({ "status": "closed" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 200);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("{base}/{thread_id}/messages"))
                .insert_header(bearer(&student))
                .set_json(serde_json::json!({ "content": "Thanks!" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 400);

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("{base}/{thread_id}/messages"))
                .insert_header(bearer(&student))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 200);
        let body = body_json(&test::read_body(resp).await);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
    }
}
