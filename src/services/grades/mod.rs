pub mod calculate;
pub mod view;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::CourseAccess;
use crate::models::grades::requests::OverrideGradeRequest;
use crate::services::define_service;

define_service!(GradeService);

impl GradeService {
    pub async fn list_course_grades(
        &self,
        course_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        view::list_course_grades(self, course_id, request).await
    }

    pub async fn calculate_grades(
        &self,
        course_id: i64,
        access: &CourseAccess,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        calculate::calculate_grades(self, course_id, access, request).await
    }

    pub async fn override_grade(
        &self,
        course_id: i64,
        user_id: i64,
        access: &CourseAccess,
        override_data: OverrideGradeRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        calculate::override_grade(self, course_id, user_id, access, override_data, request).await
    }

    // 删除成绩记录，下次计算时重新生成
    pub async fn delete_grade(
        &self,
        course_id: i64,
        user_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        calculate::delete_grade(self, course_id, user_id, request).await
    }

    pub async fn my_course_grade(
        &self,
        course_id: i64,
        access: &CourseAccess,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        view::my_course_grade(self, course_id, access, request).await
    }

    pub async fn my_grades(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        view::my_grades(self, request).await
    }
}

#[cfg(test)]
mod tests {
    use crate::models::assessments::{
        entities::{AssessmentKind, PublishStatus},
        requests::CreateAssessmentRequest,
    };
    use crate::models::course_members::{entities::CourseRole, requests::AddMemberRequest};
    use crate::models::courses::requests::CreateCourseRequest;
    use crate::models::users::entities::{User, UserProfile, UserRole};
    use crate::models::users::requests::CreateUserRequest;
    use crate::routes::configure_grades_routes;
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

    fn assessment(title: &str, weight: f64) -> CreateAssessmentRequest {
        CreateAssessmentRequest {
            kind: AssessmentKind::Assignment,
            title: title.into(),
            description: None,
            weight,
            due_date: None,
            available_from: None,
            available_to: None,
            status: Some(PublishStatus::Published),
            max_attempts: 0,
            passing_score: None,
        }
    }

    #[actix_web::test]
    async fn test_calculate_respects_overrides() {
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::in_memory().await);
        let lecturer = seed_user(storage.as_ref(), "lecturer1", UserRole::Instructor).await;
        let alice = seed_user(storage.as_ref(), "alice01", UserRole::Student).await;
        let bob = seed_user(storage.as_ref(), "bob0001", UserRole::Student).await;
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
            (alice.id, CourseRole::Student),
            (bob.id, CourseRole::Student),
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

        let hw = storage
            .create_assessment(course.id, lecturer.id, assessment("HW1", 40.0))
            .await
            .unwrap();
        let project = storage
            .create_assessment(course.id, lecturer.id, assessment("Project", 60.0))
            .await
            .unwrap();
        for (assessment_id, user_id, score) in [
            (hw.id, alice.id, 80.0),
            (project.id, alice.id, 90.0),
            (hw.id, bob.id, 50.0),
        ] {
            let submission = storage
                .create_submission(assessment_id, user_id, 1, "answer".into(), false)
                .await
                .unwrap();
            storage
                .grade_submission(submission.id, score, None, lecturer.id)
                .await
                .unwrap();
        }

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage.clone()))
                .configure(configure_grades_routes),
        )
        .await;
        let base = format!("/api/v1/courses/{}/grades", course.id);

        let resp = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&format!("{base}/{}", bob.id))
                .insert_header(bearer(&lecturer))
                .set_json(serde_json::json!({ "score": 72.0, "remarks": "makeup exam" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 200);

        // 学生无权计算成绩
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("{base}/calculate"))
                .insert_header(bearer(&alice))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 403);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("{base}/calculate"))
                .insert_header(bearer(&lecturer))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 200);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["calculated"], 1);
        assert_eq!(body["data"]["skipped_overrides"], 1);

        let alice_grade = storage.get_grade(course.id, alice.id).await.unwrap().unwrap();
        // (40*80 + 60*90) / 100
        assert_eq!(alice_grade.score, 86.0);
        assert_eq!(alice_grade.letter_grade, "A");

        let bob_grade = storage.get_grade(course.id, bob.id).await.unwrap().unwrap();
        assert!(bob_grade.is_override);
        assert_eq!(bob_grade.letter_grade, "B");

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/grades/me")
                .insert_header(bearer(&alice))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 200);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
    }
}
