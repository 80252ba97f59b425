use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::{AuthService, session};
use crate::errors::LmsError;
use crate::middlewares::RequireJWT;
use crate::models::auth::{
    RefreshTokenRequest,
    responses::{RefreshTokenResponse, TokenVerificationResponse, UserInfoResponse},
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::internal_error;
use crate::utils::jwt::JwtUtils;

pub async fn handle_refresh_token(
    service: &AuthService,
    refresh_request: RefreshTokenRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    // 请求体优先，其次读取 cookie
    let raw = refresh_request
        .refresh_token
        .filter(|token| !token.is_empty())
        .or_else(|| JwtUtils::extract_refresh_token_from_cookie(request));
    let Some(raw) = raw else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::RefreshTokenMissing,
            "Refresh token is required",
        )));
    };

    match session::rotate_session(storage.as_ref(), &raw).await {
        Ok((user, issued)) => {
            info!("Refresh token rotated for user {}", user.username);
            let cookie = JwtUtils::create_refresh_token_cookie(
                &issued.refresh_token,
                issued.refresh_expires_in(),
            );
            Ok(HttpResponse::Ok().cookie(cookie).json(ApiResponse::success(
                RefreshTokenResponse::from(&issued),
                "Token refreshed successfully",
            )))
        }
        Err(e) => {
            let code = match e {
                LmsError::RefreshTokenInvalid(_) => ErrorCode::RefreshTokenInvalid,
                LmsError::RefreshTokenExpired(_) => ErrorCode::RefreshTokenExpired,
                _ => return Ok(internal_error("Token refresh failed", e)),
            };
            warn!("Refresh token rejected: {e}");

            // 清除无效的 refresh token cookie
            Ok(HttpResponse::Unauthorized()
                .cookie(JwtUtils::create_empty_refresh_token_cookie())
                .json(ApiResponse::error_empty(
                    code,
                    "Login expired or invalid, please login again",
                )))
        }
    }
}

pub async fn handle_verify_token(
    _service: &AuthService,
    _request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        TokenVerificationResponse { is_valid: true },
        "Token is valid",
    )))
}

pub async fn handle_get_user(
    _service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    match RequireJWT::extract_user_claims(request) {
        Some(user) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UserInfoResponse { user },
            "User information retrieved successfully",
        ))),
        None => Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        ))),
    }
}
