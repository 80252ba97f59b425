pub mod login;
pub mod logout;
pub mod register;
pub mod session;
pub mod token;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::auth::{LoginRequest, LogoutRequest, RefreshTokenRequest, RegisterRequest};
use crate::services::define_service;

define_service!(AuthService);

impl AuthService {
    // 登录验证
    pub async fn login(
        &self,
        login_request: LoginRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        login::handle_login(self, login_request, request).await
    }

    // 学生自助注册
    pub async fn register(
        &self,
        register_request: RegisterRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        register::handle_register(self, register_request, request).await
    }

    // 轮换刷新令牌
    pub async fn refresh_token(
        &self,
        refresh_request: RefreshTokenRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        token::handle_refresh_token(self, refresh_request, request).await
    }

    pub async fn verify_token(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        token::handle_verify_token(self, request).await
    }

    pub async fn get_user(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        token::handle_get_user(self, request).await
    }

    pub async fn logout(
        &self,
        logout_request: LogoutRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        logout::handle_logout(self, logout_request, request).await
    }

    pub async fn logout_all(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        logout::handle_logout_all(self, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::{UserProfile, UserRole};
    use crate::models::users::requests::CreateUserRequest;
    use crate::routes::configure_auth_routes;
    use crate::storage::{Storage, sea_orm_storage::SeaOrmStorage};
    use crate::utils::jwt::JwtUtils;
    use crate::utils::password::hash_password;
    use actix_web::{App, test, web};
    use std::sync::Arc;

    async fn storage_with_user(password: &str) -> Arc<dyn Storage> {
        let storage = SeaOrmStorage::in_memory().await;
        storage
            .create_user(CreateUserRequest {
                username: "alice01".into(),
                email: "alice@example.com".into(),
                password: hash_password(password).unwrap(),
                role: UserRole::Student,
                profile: UserProfile::default(),
            })
            .await
            .unwrap();
        Arc::new(storage)
    }

    fn body_json(bytes: &[u8]) -> serde_json::Value {
        serde_json::from_slice(bytes).unwrap()
    }

    #[actix_web::test]
    async fn test_login_refresh_logout_flow() {
        let storage = storage_with_user("Secret123x").await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage.clone()))
                .configure(configure_auth_routes),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/auth/login")
                .set_json(serde_json::json!({
                    "username": "alice@example.com",
                    "password": "Secret123x"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 200);
        let body = body_json(&test::read_body(resp).await);
        let refresh = body["data"]["refresh_token"].as_str().unwrap().to_string();
        let access = body["data"]["access_token"].as_str().unwrap().to_string();
        assert_eq!(body["data"]["user"]["username"], "alice01");

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/auth/refresh")
                .set_json(serde_json::json!({ "refresh_token": refresh }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 200);
        let body = body_json(&test::read_body(resp).await);
        let rotated = body["data"]["refresh_token"].as_str().unwrap().to_string();

        // 旧令牌已失效
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/auth/refresh")
                .set_json(serde_json::json!({ "refresh_token": refresh }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 401);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/auth/logout")
                .insert_header(("Authorization", format!("Bearer {access}")))
                .set_json(serde_json::json!({ "refresh_token": rotated }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 200);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/auth/refresh")
                .set_json(serde_json::json!({ "refresh_token": rotated }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 401);
    }

    #[actix_web::test]
    async fn test_login_rejects_wrong_password() {
        let storage = storage_with_user("Secret123x").await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage))
                .configure(configure_auth_routes),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/auth/login")
                .set_json(serde_json::json!({ "username": "alice01", "password": "nope" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 401);
    }

    #[actix_web::test]
    async fn test_register_creates_student() {
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::in_memory().await);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage.clone()))
                .configure(configure_auth_routes),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/auth/register")
                .set_json(serde_json::json!({
                    "username": "newbie",
                    "email": "newbie@example.com",
                    "password": "Str0ngPass"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 201);

        let user = storage.get_user_by_username("newbie").await.unwrap().unwrap();
        assert_eq!(user.role, UserRole::Student);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/auth/register")
                .set_json(serde_json::json!({
                    "username": "weakling",
                    "email": "weak@example.com",
                    "password": "short"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 400);
    }

    #[actix_web::test]
    async fn test_me_and_logout_all() {
        let storage = storage_with_user("Secret123x").await;
        let user = storage.get_user_by_username("alice01").await.unwrap().unwrap();
        session::issue_session(storage.as_ref(), &user, false)
            .await
            .unwrap();
        let access = JwtUtils::generate_access_token(user.id, &user.role).unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage.clone()))
                .configure(configure_auth_routes),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/auth/me")
                .insert_header(("Authorization", format!("Bearer {access}")))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 200);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/auth/logout-all")
                .insert_header(("Authorization", format!("Bearer {access}")))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 200);
        let body = body_json(&test::read_body(resp).await);
        assert_eq!(body["data"]["revoked_sessions"], 1);

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/v1/auth/me").to_request(),
        )
        .await;
        assert_eq!(resp.status(), 401);
    }
}
