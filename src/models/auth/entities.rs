use serde::Serialize;
use ts_rs::TS;

/// 服务端保存的刷新令牌记录，只含哈希，不含原始令牌
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct RefreshToken {
    pub id: i64,
    pub user_id: i64,
    #[serde(skip_serializing)]
    #[ts(skip)]
    pub token_hash: String,
    pub remember_me: bool,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl RefreshToken {
    pub fn is_expired_at(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        self.expires_at <= now
    }
}

/// 新签发的令牌对，refresh_token 为返回给客户端的原始值
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub access_token: String,
    pub access_expires_in: i64,
    pub refresh_token: String,
    pub refresh_expires_at: chrono::DateTime<chrono::Utc>,
    pub remember_me: bool,
}

impl IssuedSession {
    /// 刷新令牌剩余有效秒数
    pub fn refresh_expires_in(&self) -> i64 {
        (self.refresh_expires_at - chrono::Utc::now())
            .num_seconds()
            .max(0)
    }
}
