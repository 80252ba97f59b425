use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::UserService;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{
        entities::UserProfile,
        requests::{ChangePasswordRequest, UpdateProfileRequest, UpdateUserRequest},
        responses::UserResponse,
    },
};
use crate::services::auth::session;
use crate::services::{bad_request, conflict, internal_error, invalidate_cached_user, not_found};
use crate::utils::password::{hash_password, verify_password};
use crate::utils::validate::{validate_email, validate_password};

fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(
        ErrorCode::Unauthorized,
        "Unauthorized access, please login",
    ))
}

pub async fn get_me(_service: &UserService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    match RequireJWT::extract_user_claims(request) {
        Some(user) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UserResponse::from(user),
            "User retrieved successfully",
        ))),
        None => Ok(unauthorized()),
    }
}

pub async fn update_me(
    service: &UserService,
    update_data: UpdateProfileRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };

    if let Some(email) = &update_data.email
        && let Err(msg) = validate_email(email)
    {
        return Ok(bad_request(ErrorCode::UserEmailInvalid, msg));
    }

    let update = UpdateUserRequest {
        email: update_data.email,
        profile: Some(UserProfile {
            full_name: update_data.full_name,
            department: update_data.department,
            avatar_url: update_data.avatar_url,
        }),
        ..Default::default()
    };

    match storage.update_user(user_id, update).await {
        Ok(Some(user)) => {
            invalidate_cached_user(request, user_id).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                UserResponse::from(user),
                "Profile updated successfully",
            )))
        }
        Ok(None) => Ok(not_found(ErrorCode::UserNotFound, "User not found")),
        Err(e) if e.is_conflict() => Ok(conflict(
            ErrorCode::UserAlreadyExists,
            "Email already in use",
        )),
        Err(e) => Ok(internal_error("Profile update failed", e)),
    }
}

pub async fn change_password(
    service: &UserService,
    password_data: ChangePasswordRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };

    // 缓存里的用户不带密码哈希，必须从存储重新读取
    let user = match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => return Ok(not_found(ErrorCode::UserNotFound, "User not found")),
        Err(e) => return Ok(internal_error("Password change failed", e)),
    };

    if !verify_password(&password_data.current_password, &user.password_hash) {
        return Ok(bad_request(
            ErrorCode::PasswordIncorrect,
            "Current password is incorrect",
        ));
    }
    if let Err(msg) = validate_password(&password_data.new_password) {
        return Ok(bad_request(ErrorCode::PasswordPolicyViolation, msg));
    }

    let password_hash = match hash_password(&password_data.new_password) {
        Ok(hash) => hash,
        Err(e) => return Ok(internal_error("Password change failed", e)),
    };

    let update = UpdateUserRequest {
        password: Some(password_hash),
        ..Default::default()
    };
    if let Err(e) = storage.update_user(user_id, update).await {
        return Ok(internal_error("Password change failed", e));
    }

    let revoked = match session::revoke_all_sessions(storage.as_ref(), user_id).await {
        Ok(count) => count,
        Err(e) => return Ok(internal_error("Password changed but session revocation failed", e)),
    };
    invalidate_cached_user(request, user_id).await;
    info!("User {} changed password, {revoked} sessions revoked", user.username);

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
        "Password changed successfully, please login again",
    )))
}
