use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{AuthService, session};
use crate::models::{
    ApiResponse, ErrorCode,
    auth::{LoginResponse, RegisterRequest},
    users::{entities::UserRole, requests::CreateUserRequest},
};
use crate::services::internal_error;
use crate::utils::jwt::JwtUtils;
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_password, validate_username};

pub async fn handle_register(
    service: &AuthService,
    register_request: RegisterRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if let Err(msg) = validate_username(&register_request.username) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserNameInvalid, msg)));
    }
    if let Err(msg) = validate_email(&register_request.email) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserEmailInvalid, msg)));
    }
    if let Err(msg) = validate_password(&register_request.password) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::PasswordPolicyViolation,
            msg,
        )));
    }

    // 用户名与邮箱都不能被占用
    match storage.get_user_by_username(&register_request.username).await {
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::UserAlreadyExists,
                "Username already taken",
            )));
        }
        Ok(None) => {}
        Err(e) => return Ok(internal_error("Registration failed", e)),
    }
    match storage.get_user_by_email(&register_request.email).await {
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::UserAlreadyExists,
                "Email already registered",
            )));
        }
        Ok(None) => {}
        Err(e) => return Ok(internal_error("Registration failed", e)),
    }

    let password_hash = match hash_password(&register_request.password) {
        Ok(hash) => hash,
        Err(e) => return Ok(internal_error("Registration failed", e)),
    };

    let user = match storage
        .create_user(CreateUserRequest {
            username: register_request.username,
            email: register_request.email,
            password: password_hash,
            role: UserRole::Student,
            profile: register_request.profile,
        })
        .await
    {
        Ok(user) => user,
        Err(e) if e.is_conflict() => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::UserAlreadyExists,
                "Username or email already taken",
            )));
        }
        Err(e) => {
            tracing::error!("Failed to register user: {e}");
            return Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::RegisterFailed,
                "Registration failed",
            )));
        }
    };

    let issued = match session::issue_session(storage.as_ref(), &user, false).await {
        Ok(issued) => issued,
        Err(e) => return Ok(internal_error("Registration succeeded but login failed", e)),
    };

    info!("User {} registered", user.username);

    let cookie =
        JwtUtils::create_refresh_token_cookie(&issued.refresh_token, issued.refresh_expires_in());
    Ok(HttpResponse::Created().cookie(cookie).json(ApiResponse::success(
        LoginResponse::new(&issued, user),
        "Registration successful",
    )))
}
