//! 配置管理
//!
//! 配置来源优先级（由低到高）：内置默认值、`config.toml`、`config.{APP_ENV}.toml`、
//! `LMS_` 前缀环境变量、常用环境变量。

mod r#impl;
mod structs;

pub use structs::*;

/// 生产环境下仍使用该密钥时会在启动时告警
pub const DEFAULT_JWT_SECRET: &str = "change-me-in-production";
