pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod profile;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::users::requests::{
    ChangePasswordRequest, CreateUserRequest, UpdateProfileRequest, UpdateUserRequest,
    UserListParams,
};
use crate::services::define_service;

define_service!(UserService);

impl UserService {
    // 获取用户列表
    pub async fn list_users(
        &self,
        query: UserListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_users(self, query, request).await
    }

    // 创建用户
    pub async fn create_user(
        &self,
        user_data: CreateUserRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_user(self, user_data, request).await
    }

    // 根据ID获取用户
    pub async fn get_user(&self, user_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_user(self, user_id, request).await
    }

    // 更新用户信息
    pub async fn update_user(
        &self,
        user_id: i64,
        update_data: UpdateUserRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_user(self, user_id, update_data, request).await
    }

    // 删除用户
    pub async fn delete_user(
        &self,
        user_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_user(self, user_id, request).await
    }

    pub async fn get_me(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        profile::get_me(self, request).await
    }

    // 更新当前用户资料
    pub async fn update_me(
        &self,
        update_data: UpdateProfileRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        profile::update_me(self, update_data, request).await
    }

    pub async fn change_password(
        &self,
        password_data: ChangePasswordRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        profile::change_password(self, password_data, request).await
    }
}

#[cfg(test)]
mod tests {
    use crate::models::users::entities::{User, UserProfile, UserRole};
    use crate::models::users::requests::CreateUserRequest;
    use crate::routes::configure_user_routes;
    use crate::services::auth::session;
    use crate::storage::{Storage, sea_orm_storage::SeaOrmStorage};
    use crate::utils::jwt::JwtUtils;
    use crate::utils::token::hash_refresh_token;
    use actix_web::{App, test, web};
    use sea_orm::ConnectionTrait;
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

    fn reset_password(admin: &User, user_id: i64) -> test::TestRequest {
        test::TestRequest::put()
            .uri(&format!("/api/v1/users/{user_id}"))
            .insert_header(bearer(admin))
            .set_json(serde_json::json!({ "password": "NewSecret123" }))
    }

    #[actix_web::test]
    async fn test_admin_password_reset_revokes_sessions() {
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::in_memory().await);
        let admin = seed_user(storage.as_ref(), "root01", UserRole::Admin).await;
        let student = seed_user(storage.as_ref(), "ivy0001", UserRole::Student).await;
        let issued = session::issue_session(storage.as_ref(), &student, false)
            .await
            .unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage.clone()))
                .configure(configure_user_routes),
        )
        .await;

        let resp = test::call_service(&app, reset_password(&admin, student.id).to_request()).await;
        assert_eq!(resp.status(), 200);
        assert!(
            storage
                .get_refresh_token_by_hash(&hash_refresh_token(&issued.refresh_token))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[actix_web::test]
    async fn test_admin_password_reset_fails_when_revocation_fails() {
        let sea = Arc::new(SeaOrmStorage::in_memory().await);
        let storage: Arc<dyn Storage> = sea.clone();
        let admin = seed_user(storage.as_ref(), "root02", UserRole::Admin).await;
        let student = seed_user(storage.as_ref(), "jack0001", UserRole::Student).await;
        sea.db
            .execute_unprepared("DROP TABLE refresh_tokens")
            .await
            .unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage.clone()))
                .configure(configure_user_routes),
        )
        .await;

        let resp = test::call_service(&app, reset_password(&admin, student.id).to_request()).await;
        assert_eq!(resp.status(), 500);
    }
}
