/*!
 * JWT 认证中间件
 *
 * 校验 `Authorization: Bearer <token>` 中的 Access Token，
 * 按用户 ID 从缓存或存储中加载用户，并写入请求扩展。
 *
 * ```rust,ignore
 * web::scope("/api/v1/courses")
 *     .wrap(RequireJWT)
 *     .route("", web::get().to(list_courses))
 * ```
 *
 * 处理函数中通过 `RequireJWT::extract_user_claims(&req)` 取得当前用户。
 * 非 active 状态的用户一律返回 401。
 */

use crate::cache::{CacheResult, ObjectCache, user_cache_key};
use crate::config::AppConfig;
use crate::models::ErrorCode;
use crate::models::users::entities::User;
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;
use actix_service::{Service, Transform};
use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest,
    body::EitherBody,
    dev::{Payload, ServiceRequest, ServiceResponse},
    error::InternalError,
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, info, warn};

const BEARER_PREFIX: &str = "Bearer ";

use super::create_error_response;

#[derive(Clone)]
pub struct RequireJWT;

// 缓存命中且可反序列化时直接使用，否则回源存储
async fn load_user(req: &ServiceRequest, user_id: i64) -> Result<User, String> {
    let cache = req
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|data| data.get_ref().clone());
    let key = user_cache_key(user_id);

    if let Some(cache) = &cache {
        match cache.get_raw(&key).await {
            CacheResult::Found(json) => match serde_json::from_str::<User>(&json) {
                Ok(user) => return Ok(user),
                Err(e) => {
                    debug!("Dropping undecodable cached user {}: {}", user_id, e);
                    cache.remove(&key).await;
                }
            },
            CacheResult::NotFound => {}
            CacheResult::ExistsButNoValue => debug!("Cache backend unavailable for {}", key),
        }
    }

    let storage = req
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| "Storage is not configured".to_string())?;

    let user = storage
        .get_user_by_id(user_id)
        .await
        .map_err(|e| {
            warn!("Failed to load user {} for JWT check: {}", user_id, e);
            "Failed to retrieve user".to_string()
        })?
        .ok_or_else(|| "User not found".to_string())?;

    if let Some(cache) = &cache
        && let Ok(json) = serde_json::to_string(&user)
    {
        cache
            .insert_raw(key, json, AppConfig::get().cache.default_ttl)
            .await;
    }

    Ok(user)
}

async fn authenticate(req: &ServiceRequest) -> Result<User, String> {
    let token = req
        .headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .ok_or_else(|| "Missing or invalid Authorization header".to_string())?;

    let claims = JwtUtils::verify_access_token(token).map_err(|err| {
        debug!("JWT validation failed: {}", err);
        "Invalid or expired token".to_string()
    })?;

    let user_id = claims
        .user_id()
        .ok_or_else(|| "Invalid user ID in token".to_string())?;

    let user = load_user(req, user_id).await?;
    if !user.is_active() {
        return Err("User is not active".to_string());
    }

    Ok(user)
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 预检请求直接放行
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            match authenticate(&req).await {
                Ok(user) => {
                    debug!("JWT authentication successful for user {}", user.id);
                    req.extensions_mut().insert(user);
                    Ok(srv.call(req).await?.map_into_left_body())
                }
                Err(err) => {
                    info!("JWT authentication failed for {}: {}", req.path(), err);
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            &format!("Unauthorized: {err}"),
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

impl RequireJWT {
    /// 取出当前用户；只能在 RequireJWT 保护的路由中使用
    pub fn extract_user_claims(req: &actix_web::HttpRequest) -> Option<User> {
        req.extensions().get::<User>().cloned()
    }

    pub fn extract_user_id(req: &actix_web::HttpRequest) -> Option<i64> {
        req.extensions().get::<User>().map(|user| user.id)
    }
}

/// 处理函数参数形式的当前用户，未经过 RequireJWT 时返回 401
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequest for CurrentUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            RequireJWT::extract_user_claims(req)
                .map(CurrentUser)
                .ok_or_else(|| {
                    InternalError::from_response(
                        "missing user",
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            "Authentication required",
                        ),
                    )
                    .into()
                }),
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::cache::{ObjectCache, object_cache::moka::MokaCacheWrapper};
    use crate::models::users::entities::{User, UserProfile, UserRole, UserStatus};
    use crate::models::users::requests::{CreateUserRequest, UpdateUserRequest};
    use crate::routes::configure_user_routes;
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

    fn suspend() -> UpdateUserRequest {
        UpdateUserRequest {
            status: Some(UserStatus::Suspended),
            ..Default::default()
        }
    }

    #[actix_web::test]
    async fn test_inactive_user_with_valid_token_is_rejected() {
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::in_memory().await);
        let suspended = seed_user(storage.as_ref(), "frank01", UserRole::Student).await;
        let inactive = seed_user(storage.as_ref(), "grace01", UserRole::Student).await;
        storage.update_user(suspended.id, suspend()).await.unwrap();
        storage
            .update_user(
                inactive.id,
                UpdateUserRequest {
                    status: Some(UserStatus::Inactive),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage.clone()))
                .configure(configure_user_routes),
        )
        .await;

        for user in [&suspended, &inactive] {
            let resp = test::call_service(
                &app,
                test::TestRequest::get()
                    .uri("/api/v1/users/me")
                    .insert_header(bearer(user))
                    .to_request(),
            )
            .await;
            assert_eq!(resp.status(), 401);
        }

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/users/me")
                .insert_header(("Authorization", "Bearer not-a-token"))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 401);
    }

    #[actix_web::test]
    async fn test_cached_user_dropped_after_admin_update() {
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::in_memory().await);
        let cache: Arc<dyn ObjectCache> = Arc::new(MokaCacheWrapper::new().unwrap());
        let admin = seed_user(storage.as_ref(), "root01", UserRole::Admin).await;
        let student = seed_user(storage.as_ref(), "henry01", UserRole::Student).await;

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage.clone()))
                .app_data(web::Data::new(cache.clone()))
                .configure(configure_user_routes),
        )
        .await;
        let me = || {
            test::TestRequest::get()
                .uri("/api/v1/users/me")
                .insert_header(bearer(&student))
                .to_request()
        };

        let resp = test::call_service(&app, me()).await;
        assert_eq!(resp.status(), 200);

        // 绕过服务层修改，缓存中的用户仍然有效
        storage.update_user(student.id, suspend()).await.unwrap();
        let resp = test::call_service(&app, me()).await;
        assert_eq!(resp.status(), 200);

        let resp = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&format!("/api/v1/users/{}", student.id))
                .insert_header(bearer(&admin))
                .set_json(serde_json::json!({ "status": "suspended" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 200);

        let resp = test::call_service(&app, me()).await;
        assert_eq!(resp.status(), 401);
    }
}
