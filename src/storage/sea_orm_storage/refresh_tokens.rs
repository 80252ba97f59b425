//! 刷新令牌存储操作

use super::SeaOrmStorage;
use crate::entity::refresh_tokens::{ActiveModel, Column, Entity as RefreshTokens};
use crate::errors::{LmsError, Result};
use crate::models::auth::entities::RefreshToken;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

impl SeaOrmStorage {
    pub async fn create_refresh_token_impl(
        &self,
        user_id: i64,
        token_hash: &str,
        remember_me: bool,
        expires_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<RefreshToken> {
        let model = ActiveModel {
            user_id: Set(user_id),
            token_hash: Set(token_hash.to_string()),
            remember_me: Set(remember_me),
            expires_at: Set(expires_at.timestamp()),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LmsError::from_db("保存刷新令牌失败", e))?;

        Ok(result.into_refresh_token())
    }

    pub async fn get_refresh_token_by_hash_impl(
        &self,
        token_hash: &str,
    ) -> Result<Option<RefreshToken>> {
        let result = RefreshTokens::find()
            .filter(Column::TokenHash.eq(token_hash))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询刷新令牌失败: {e}")))?;

        Ok(result.map(|m| m.into_refresh_token()))
    }

    /// 删除单个刷新令牌；并发轮换时只有一个请求能删除成功
    pub async fn delete_refresh_token_by_hash_impl(&self, token_hash: &str) -> Result<bool> {
        let result = RefreshTokens::delete_many()
            .filter(Column::TokenHash.eq(token_hash))
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("删除刷新令牌失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn delete_user_refresh_tokens_impl(&self, user_id: i64) -> Result<u64> {
        let result = RefreshTokens::delete_many()
            .filter(Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("注销用户会话失败: {e}")))?;

        Ok(result.rows_affected)
    }

    pub async fn delete_expired_refresh_tokens_impl(
        &self,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<u64> {
        let result = RefreshTokens::delete_many()
            .filter(Column::ExpiresAt.lte(now.timestamp()))
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("清理过期刷新令牌失败: {e}")))?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::users::tests::seed_user;
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn test_delete_by_hash_reports_removal_once() {
        let storage = SeaOrmStorage::in_memory().await;
        let user = seed_user(&storage, "tokenuser", UserRole::Student).await;
        storage
            .create_refresh_token_impl(user.id, "h1", false, Utc::now() + Duration::days(1))
            .await
            .unwrap();

        assert!(storage.delete_refresh_token_by_hash_impl("h1").await.unwrap());
        assert!(!storage.delete_refresh_token_by_hash_impl("h1").await.unwrap());
    }

    #[tokio::test]
    async fn test_purge_only_removes_expired() {
        let storage = SeaOrmStorage::in_memory().await;
        let user = seed_user(&storage, "purgeuser", UserRole::Student).await;
        let now = Utc::now();
        storage
            .create_refresh_token_impl(user.id, "old", false, now - Duration::hours(1))
            .await
            .unwrap();
        storage
            .create_refresh_token_impl(user.id, "fresh", true, now + Duration::days(30))
            .await
            .unwrap();

        assert_eq!(storage.delete_expired_refresh_tokens_impl(now).await.unwrap(), 1);
        let fresh = storage.get_refresh_token_by_hash_impl("fresh").await.unwrap().unwrap();
        assert!(fresh.remember_me);
        assert_eq!(storage.delete_user_refresh_tokens_impl(user.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_tokens_cascade_with_user() {
        let storage = SeaOrmStorage::in_memory().await;
        let user = seed_user(&storage, "gonegone", UserRole::Student).await;
        storage
            .create_refresh_token_impl(user.id, "h2", false, Utc::now() + Duration::days(1))
            .await
            .unwrap();
        storage.delete_user_impl(user.id).await.unwrap();
        assert!(storage.get_refresh_token_by_hash_impl("h2").await.unwrap().is_none());
    }
}
