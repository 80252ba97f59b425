pub mod attempts;
pub mod crud;
pub mod questions;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::CourseAccess;
use crate::models::exams::requests::{
    CreateExamRequest, CreateQuestionRequest, SubmitAttemptRequest, UpdateExamRequest,
    UpdateQuestionRequest,
};
use crate::services::define_service;

define_service!(ExamService);

impl ExamService {
    pub async fn list_exams(
        &self,
        course_id: i64,
        access: &CourseAccess,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        crud::list_exams(self, course_id, access, request).await
    }

    pub async fn create_exam(
        &self,
        course_id: i64,
        access: &CourseAccess,
        exam_data: CreateExamRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        crud::create_exam(self, course_id, access, exam_data, request).await
    }

    pub async fn get_exam(
        &self,
        course_id: i64,
        exam_id: i64,
        access: &CourseAccess,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        crud::get_exam(self, course_id, exam_id, access, request).await
    }

    pub async fn update_exam(
        &self,
        course_id: i64,
        exam_id: i64,
        update_data: UpdateExamRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        crud::update_exam(self, course_id, exam_id, update_data, request).await
    }

    pub async fn delete_exam(
        &self,
        course_id: i64,
        exam_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        crud::delete_exam(self, course_id, exam_id, request).await
    }

    // 试题列表，学生视图不含正确答案
    pub async fn list_questions(
        &self,
        course_id: i64,
        exam_id: i64,
        access: &CourseAccess,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        questions::list_questions(self, course_id, exam_id, access, request).await
    }

    pub async fn create_question(
        &self,
        course_id: i64,
        exam_id: i64,
        question_data: CreateQuestionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        questions::create_question(self, course_id, exam_id, question_data, request).await
    }

    pub async fn update_question(
        &self,
        course_id: i64,
        exam_id: i64,
        question_id: i64,
        update_data: UpdateQuestionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        questions::update_question(self, course_id, exam_id, question_id, update_data, request)
            .await
    }

    pub async fn delete_question(
        &self,
        course_id: i64,
        exam_id: i64,
        question_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        questions::delete_question(self, course_id, exam_id, question_id, request).await
    }

    // 开始作答
    pub async fn start_attempt(
        &self,
        course_id: i64,
        exam_id: i64,
        access: &CourseAccess,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        attempts::start_attempt(self, course_id, exam_id, access, request).await
    }

    // 交卷并自动判分
    pub async fn submit_attempt(
        &self,
        course_id: i64,
        exam_id: i64,
        attempt_id: i64,
        access: &CourseAccess,
        submit_data: SubmitAttemptRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        attempts::submit_attempt(
            self,
            course_id,
            exam_id,
            attempt_id,
            access,
            submit_data,
            request,
        )
        .await
    }

    pub async fn list_attempts(
        &self,
        course_id: i64,
        exam_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        attempts::list_attempts(self, course_id, exam_id, request).await
    }

    pub async fn my_attempts(
        &self,
        course_id: i64,
        exam_id: i64,
        access: &CourseAccess,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        attempts::my_attempts(self, course_id, exam_id, access, request).await
    }
}

#[cfg(test)]
mod tests {
    use crate::entity::exam_attempts::{Column as AttemptColumn, Entity as ExamAttempts};
    use crate::models::course_members::{entities::CourseRole, requests::AddMemberRequest};
    use crate::models::courses::{entities::Course, requests::CreateCourseRequest};
    use crate::models::exams::entities::AttemptStatus;
    use crate::models::users::entities::{User, UserProfile, UserRole};
    use crate::models::users::requests::CreateUserRequest;
    use crate::routes::configure_exams_routes;
    use crate::storage::{Storage, sea_orm_storage::SeaOrmStorage};
    use crate::utils::jwt::JwtUtils;
    use actix_web::{App, test, web};
    use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, sea_query::Expr};
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

    async fn seed_course(storage: &dyn Storage, lecturer: &User, student: &User) -> Course {
        let course = storage
            .create_course(CreateCourseRequest {
                code: "MA101".into(),
                title: "Calculus".into(),
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
        course
    }

    fn bearer(user: &User) -> (&'static str, String) {
        let token = JwtUtils::generate_access_token(user.id, &user.role).unwrap();
        ("Authorization", format!("Bearer {token}"))
    }

    fn body_json(bytes: &[u8]) -> serde_json::Value {
        serde_json::from_slice(bytes).unwrap()
    }

    #[actix_web::test]
    async fn test_attempt_lifecycle_limits_and_expiry() {
        let sea = Arc::new(SeaOrmStorage::in_memory().await);
        let storage: Arc<dyn Storage> = sea.clone();
        let lecturer = seed_user(storage.as_ref(), "lecturer1", UserRole::Instructor).await;
        let student = seed_user(storage.as_ref(), "student1", UserRole::Student).await;
        let course = seed_course(storage.as_ref(), &lecturer, &student).await;

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage.clone()))
                .configure(configure_exams_routes),
        )
        .await;
        let base = format!("/api/v1/courses/{}/exams", course.id);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&base)
                .insert_header(bearer(&lecturer))
                .set_json(serde_json::json!({
                    "title": "Quiz 1",
                    "duration_minutes": 30,
                    "max_attempts": 2,
                    "passing_score": 50.0,
                    "status": "published"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 201);
        let exam_id = body_json(&test::read_body(resp).await)["data"]["id"]
            .as_i64()
            .unwrap();

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("{base}/{exam_id}/questions"))
                .insert_header(bearer(&lecturer))
                .set_json(serde_json::json!({
                    "question": "2 + 2?",
                    "options": ["3", "4"],
                    "correct_answer": "4",
                    "points": 2.0,
                    "position": 1
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 201);
        let question_id = body_json(&test::read_body(resp).await)["data"]["id"]
            .as_i64()
            .unwrap();

        // 学生看到的试题不带答案，教师可见
        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("{base}/{exam_id}/questions"))
                .insert_header(bearer(&student))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 200);
        let body = body_json(&test::read_body(resp).await);
        assert_eq!(body["data"][0]["question"], "2 + 2?");
        assert!(body["data"][0].get("correct_answer").is_none());

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("{base}/{exam_id}/questions"))
                .insert_header(bearer(&lecturer))
                .to_request(),
        )
        .await;
        let body = body_json(&test::read_body(resp).await);
        assert_eq!(body["data"][0]["correct_answer"], "4");

        let start = |user: &User| {
            test::TestRequest::post()
                .uri(&format!("{base}/{exam_id}/attempts"))
                .insert_header(bearer(user))
                .to_request()
        };

        let resp = test::call_service(&app, start(&student)).await;
        assert_eq!(resp.status(), 201);
        let first = body_json(&test::read_body(resp).await)["data"].clone();
        assert_eq!(first["attempt_number"], 1);
        let first_id = first["id"].as_i64().unwrap();

        // 作答未结束时再次开始，返回进行中的作答
        let resp = test::call_service(&app, start(&student)).await;
        assert_eq!(resp.status(), 409);
        let body = body_json(&test::read_body(resp).await);
        assert_eq!(body["code"], 7021);
        assert_eq!(body["data"]["id"], first_id);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("{base}/{exam_id}/attempts/{first_id}/submit"))
                .insert_header(bearer(&student))
                .set_json(serde_json::json!({
                    "answers": [{ "question_id": question_id, "answer": " 4 " }]
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 200);
        let body = body_json(&test::read_body(resp).await);
        assert_eq!(body["data"]["attempt"]["score"], 100.0);
        assert_eq!(body["data"]["passed"], true);

        let resp = test::call_service(&app, start(&student)).await;
        assert_eq!(resp.status(), 201);
        let second = body_json(&test::read_body(resp).await)["data"].clone();
        assert_eq!(second["attempt_number"], 2);
        let second_id = second["id"].as_i64().unwrap();

        // 把开始时间推到时限之前
        let started_long_ago = chrono::Utc::now().timestamp() - 2 * 3600;
        ExamAttempts::update_many()
            .col_expr(AttemptColumn::StartedAt, Expr::value(started_long_ago))
            .filter(AttemptColumn::Id.eq(second_id))
            .exec(&sea.db)
            .await
            .unwrap();

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("{base}/{exam_id}/attempts/{second_id}/submit"))
                .insert_header(bearer(&student))
                .set_json(serde_json::json!({
                    "answers": [{ "question_id": question_id, "answer": "4" }]
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 400);
        let body = body_json(&test::read_body(resp).await);
        assert_eq!(body["code"], 7023);

        let expired = storage.get_attempt(exam_id, second_id).await.unwrap().unwrap();
        assert_eq!(expired.status, AttemptStatus::Expired);
        assert_eq!(expired.score, Some(0.0));
        assert!(storage.list_attempt_answers(second_id).await.unwrap().is_empty());

        // 次数已用完
        let resp = test::call_service(&app, start(&student)).await;
        assert_eq!(resp.status(), 409);
        let body = body_json(&test::read_body(resp).await);
        assert_eq!(body["code"], 7022);

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("{base}/{exam_id}/attempts/me"))
                .insert_header(bearer(&student))
                .to_request(),
        )
        .await;
        let body = body_json(&test::read_body(resp).await);
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn test_concurrent_start_creates_single_attempt() {
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::in_memory().await);
        let lecturer = seed_user(storage.as_ref(), "lecturer2", UserRole::Instructor).await;
        let student = seed_user(storage.as_ref(), "student2", UserRole::Student).await;
        let course = seed_course(storage.as_ref(), &lecturer, &student).await;

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage.clone()))
                .configure(configure_exams_routes),
        )
        .await;
        let base = format!("/api/v1/courses/{}/exams", course.id);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&base)
                .insert_header(bearer(&lecturer))
                .set_json(serde_json::json!({
                    "title": "Midterm",
                    "duration_minutes": 60,
                    "max_attempts": 1,
                    "status": "published"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 201);
        let exam_id = body_json(&test::read_body(resp).await)["data"]["id"]
            .as_i64()
            .unwrap();

        let uri = format!("{base}/{exam_id}/attempts");
        let (a, b) = futures_util::join!(
            test::call_service(
                &app,
                test::TestRequest::post()
                    .uri(&uri)
                    .insert_header(bearer(&student))
                    .to_request(),
            ),
            test::call_service(
                &app,
                test::TestRequest::post()
                    .uri(&uri)
                    .insert_header(bearer(&student))
                    .to_request(),
            ),
        );

        let mut statuses = [a.status().as_u16(), b.status().as_u16()];
        statuses.sort_unstable();
        assert_eq!(statuses, [201, 409]);
        assert_eq!(
            storage.count_user_attempts(exam_id, student.id).await.unwrap(),
            1
        );
    }
}
