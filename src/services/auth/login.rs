use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::{AuthService, session};
use crate::models::{
    ApiResponse, ErrorCode,
    auth::{LoginRequest, LoginResponse},
};
use crate::services::internal_error;
use crate::utils::jwt::JwtUtils;
use crate::utils::password::verify_password;

fn auth_failed() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(
        ErrorCode::AuthFailed,
        "Username or password is incorrect",
    ))
}

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    // 1. 根据用户名或邮箱获取用户信息
    let user = match storage
        .get_user_by_username_or_email(login_request.username.trim())
        .await
    {
        Ok(Some(user)) => user,
        Ok(None) => return Ok(auth_failed()),
        Err(e) => return Ok(internal_error("Login failed", e)),
    };

    // 2. 验证密码；停用账号与密码错误返回相同的结果
    if !verify_password(&login_request.password, &user.password_hash) {
        warn!("Failed login attempt for {}", user.username);
        return Ok(auth_failed());
    }
    if !user.is_active() {
        warn!("Login rejected for {} user {}", user.status, user.username);
        return Ok(auth_failed());
    }

    // 3. 更新最后登录时间
    if let Err(e) = storage.update_last_login(user.id).await {
        warn!("Failed to update last login for {}: {e}", user.username);
    }

    // 4. 签发令牌对
    let issued =
        match session::issue_session(storage.as_ref(), &user, login_request.remember_me).await {
            Ok(issued) => issued,
            Err(e) => return Ok(internal_error("Login failed, unable to generate token", e)),
        };

    info!("User {} logged in successfully", user.username);

    let cookie =
        JwtUtils::create_refresh_token_cookie(&issued.refresh_token, issued.refresh_expires_in());
    Ok(HttpResponse::Ok().cookie(cookie).json(ApiResponse::success(
        LoginResponse::new(&issued, user),
        "Login successful",
    )))
}
