use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{requests::UpdateUserRequest, responses::UserResponse},
};
use crate::services::auth::session;
use crate::services::{bad_request, conflict, internal_error, invalidate_cached_user, not_found};
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_password};

pub async fn update_user(
    service: &UserService,
    user_id: i64,
    mut update_data: UpdateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if let Some(email) = &update_data.email
        && let Err(msg) = validate_email(email)
    {
        return Ok(bad_request(ErrorCode::UserEmailInvalid, msg));
    }

    // 管理员重置密码后旧会话全部作废
    let password_changed = update_data.password.is_some();
    if let Some(password) = &update_data.password {
        if let Err(msg) = validate_password(password) {
            return Ok(bad_request(ErrorCode::PasswordPolicyViolation, msg));
        }
        match hash_password(password) {
            Ok(hash) => update_data.password = Some(hash),
            Err(e) => return Ok(internal_error("User update failed", e)),
        }
    }

    match storage.update_user(user_id, update_data).await {
        Ok(Some(user)) => {
            invalidate_cached_user(request, user_id).await;
            if password_changed
                && let Err(e) = session::revoke_all_sessions(storage.as_ref(), user_id).await
            {
                return Ok(internal_error(
                    "Password reset but session revocation failed",
                    e,
                ));
            }
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                UserResponse::from(user),
                "User updated successfully",
            )))
        }
        Ok(None) => Ok(not_found(ErrorCode::UserNotFound, "User not found")),
        Err(e) if e.is_conflict() => Ok(conflict(
            ErrorCode::UserAlreadyExists,
            "Email already in use",
        )),
        Err(e) => {
            tracing::error!("User update failed: {e}");
            Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::UserUpdateFailed,
                "User update failed",
            )))
        }
    }
}
