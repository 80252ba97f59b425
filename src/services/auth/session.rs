//! 会话生命周期：签发、轮换、吊销刷新令牌
//!
//! 刷新令牌为不透明随机串，只在签发时返回一次；数据库里保存的是 SHA-256 哈希。

use crate::config::AppConfig;
use crate::errors::{LmsError, Result};
use crate::models::auth::entities::IssuedSession;
use crate::models::users::entities::User;
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;
use crate::utils::token::{generate_refresh_token, hash_refresh_token};

/// 为用户签发访问令牌和刷新令牌
pub async fn issue_session(
    storage: &dyn Storage,
    user: &User,
    remember_me: bool,
) -> Result<IssuedSession> {
    let config = AppConfig::get();
    let access_token = JwtUtils::generate_access_token(user.id, &user.role)?;

    let lifetime_days = if remember_me {
        config.jwt.refresh_token_remember_me_expiry
    } else {
        config.jwt.refresh_token_expiry
    };
    let refresh_expires_at = chrono::Utc::now() + chrono::Duration::days(lifetime_days);

    let refresh_token = generate_refresh_token();
    storage
        .create_refresh_token(
            user.id,
            &hash_refresh_token(&refresh_token),
            remember_me,
            refresh_expires_at,
        )
        .await?;

    Ok(IssuedSession {
        access_token,
        access_expires_in: config.jwt.access_token_expiry * 60,
        refresh_token,
        refresh_expires_at,
        remember_me,
    })
}

/// 用旧刷新令牌换一对新令牌，旧令牌立即失效
pub async fn rotate_session(storage: &dyn Storage, raw: &str) -> Result<(User, IssuedSession)> {
    let token_hash = hash_refresh_token(raw);

    let Some(record) = storage.get_refresh_token_by_hash(&token_hash).await? else {
        return Err(LmsError::refresh_token_invalid("Refresh token not recognised"));
    };

    if record.is_expired_at(chrono::Utc::now()) {
        storage.delete_refresh_token_by_hash(&token_hash).await?;
        return Err(LmsError::refresh_token_expired("Refresh token has expired"));
    }

    // 并发请求中只有删除成功的一方可以继续
    if !storage.delete_refresh_token_by_hash(&token_hash).await? {
        return Err(LmsError::refresh_token_invalid("Refresh token already used"));
    }

    let user = match storage.get_user_by_id(record.user_id).await? {
        Some(user) if user.is_active() => user,
        _ => {
            return Err(LmsError::refresh_token_invalid(
                "Refresh token owner is not available",
            ));
        }
    };

    let session = issue_session(storage, &user, record.remember_me).await?;
    Ok((user, session))
}

/// 吊销属于该用户的单个刷新令牌，不存在或属于他人时返回 false
pub async fn revoke_session(storage: &dyn Storage, user_id: i64, raw: &str) -> Result<bool> {
    let token_hash = hash_refresh_token(raw);
    match storage.get_refresh_token_by_hash(&token_hash).await? {
        Some(record) if record.user_id == user_id => {
            storage.delete_refresh_token_by_hash(&token_hash).await
        }
        _ => Ok(false),
    }
}

pub async fn revoke_all_sessions(storage: &dyn Storage, user_id: i64) -> Result<u64> {
    storage.delete_user_refresh_tokens(user_id).await
}

pub async fn purge_expired_sessions(storage: &dyn Storage) -> Result<u64> {
    storage
        .delete_expired_refresh_tokens(chrono::Utc::now())
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::{UserProfile, UserRole, UserStatus};
    use crate::models::users::requests::{CreateUserRequest, UpdateUserRequest};
    use crate::storage::sea_orm_storage::SeaOrmStorage;

    async fn setup() -> (SeaOrmStorage, User) {
        let storage = SeaOrmStorage::in_memory().await;
        let user = storage
            .create_user(CreateUserRequest {
                username: "session_user".into(),
                email: "session@example.com".into(),
                password: "hash".into(),
                role: UserRole::Student,
                profile: UserProfile::default(),
            })
            .await
            .unwrap();
        (storage, user)
    }

    #[tokio::test]
    async fn test_issue_stores_only_hash() {
        let (storage, user) = setup().await;
        let session = issue_session(&storage, &user, false).await.unwrap();

        assert!(
            storage
                .get_refresh_token_by_hash(&session.refresh_token)
                .await
                .unwrap()
                .is_none()
        );
        let stored = storage
            .get_refresh_token_by_hash(&hash_refresh_token(&session.refresh_token))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.user_id, user.id);
        assert!(!stored.remember_me);
    }

    #[tokio::test]
    async fn test_remember_me_lasts_longer() {
        let (storage, user) = setup().await;
        let short = issue_session(&storage, &user, false).await.unwrap();
        let long = issue_session(&storage, &user, true).await.unwrap();
        assert!(long.refresh_expires_at > short.refresh_expires_at);
    }

    #[tokio::test]
    async fn test_rotation_invalidates_old_token() {
        let (storage, user) = setup().await;
        let first = issue_session(&storage, &user, true).await.unwrap();

        let (rotated_user, second) = rotate_session(&storage, &first.refresh_token)
            .await
            .unwrap();
        assert_eq!(rotated_user.id, user.id);
        assert!(second.remember_me);
        assert_ne!(first.refresh_token, second.refresh_token);

        let err = rotate_session(&storage, &first.refresh_token)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E015");
        assert!(rotate_session(&storage, &second.refresh_token).await.is_ok());
    }

    #[tokio::test]
    async fn test_expired_token_is_deleted() {
        let (storage, user) = setup().await;
        let raw = generate_refresh_token();
        storage
            .create_refresh_token(
                user.id,
                &hash_refresh_token(&raw),
                false,
                chrono::Utc::now() - chrono::Duration::minutes(1),
            )
            .await
            .unwrap();

        let err = rotate_session(&storage, &raw).await.unwrap_err();
        assert_eq!(err.code(), "E016");
        assert!(
            storage
                .get_refresh_token_by_hash(&hash_refresh_token(&raw))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_inactive_user_cannot_rotate() {
        let (storage, user) = setup().await;
        let session = issue_session(&storage, &user, false).await.unwrap();
        storage
            .update_user(
                user.id,
                UpdateUserRequest {
                    status: Some(UserStatus::Suspended),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let err = rotate_session(&storage, &session.refresh_token)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E015");
    }

    #[tokio::test]
    async fn test_revoke_all_and_purge() {
        let (storage, user) = setup().await;
        let kept = issue_session(&storage, &user, false).await.unwrap();
        issue_session(&storage, &user, false).await.unwrap();

        assert!(revoke_session(&storage, user.id, &kept.refresh_token).await.unwrap());
        assert!(!revoke_session(&storage, user.id, &kept.refresh_token).await.unwrap());
        assert_eq!(revoke_all_sessions(&storage, user.id).await.unwrap(), 1);

        storage
            .create_refresh_token(
                user.id,
                "stale",
                false,
                chrono::Utc::now() - chrono::Duration::days(1),
            )
            .await
            .unwrap();
        assert_eq!(purge_expired_sessions(&storage).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_revoke_ignores_other_users_token() {
        let (storage, owner) = setup().await;
        let intruder = storage
            .create_user(CreateUserRequest {
                username: "other_user".into(),
                email: "other@example.com".into(),
                password: "hash".into(),
                role: UserRole::Student,
                profile: UserProfile::default(),
            })
            .await
            .unwrap();
        let session = issue_session(&storage, &owner, false).await.unwrap();

        assert!(
            !revoke_session(&storage, intruder.id, &session.refresh_token)
                .await
                .unwrap()
        );
        let (user, _) = rotate_session(&storage, &session.refresh_token)
            .await
            .unwrap();
        assert_eq!(user.id, owner.id);
    }
}
