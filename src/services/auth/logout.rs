use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{debug, info};

use super::{AuthService, session};
use crate::middlewares::RequireJWT;
use crate::models::auth::{LogoutRequest, responses::LogoutAllResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{internal_error, invalidate_cached_user};
use crate::utils::jwt::JwtUtils;

fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(
        ErrorCode::Unauthorized,
        "Unauthorized access, please login",
    ))
}

pub async fn handle_logout(
    service: &AuthService,
    logout_request: LogoutRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };

    let raw = logout_request
        .refresh_token
        .filter(|token| !token.is_empty())
        .or_else(|| JwtUtils::extract_refresh_token_from_cookie(request));
    if let Some(raw) = raw {
        match session::revoke_session(storage.as_ref(), user_id, &raw).await {
            Ok(true) => {}
            Ok(false) => debug!("Logout of user {user_id} carried no owned refresh token"),
            Err(e) => return Ok(internal_error("Logout failed", e)),
        }
    }

    invalidate_cached_user(request, user_id).await;
    info!("User {user_id} logged out");

    Ok(HttpResponse::Ok()
        .cookie(JwtUtils::create_empty_refresh_token_cookie())
        .json(ApiResponse::success_empty("Logged out successfully")))
}

pub async fn handle_logout_all(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };

    let revoked_sessions = match session::revoke_all_sessions(storage.as_ref(), user_id).await {
        Ok(count) => count,
        Err(e) => return Ok(internal_error("Logout failed", e)),
    };

    invalidate_cached_user(request, user_id).await;
    info!("User {user_id} revoked {revoked_sessions} sessions");

    Ok(HttpResponse::Ok()
        .cookie(JwtUtils::create_empty_refresh_token_cookie())
        .json(ApiResponse::success(
            LogoutAllResponse { revoked_sessions },
            "All sessions revoked",
        )))
}
