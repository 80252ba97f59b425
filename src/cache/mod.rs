//! 缓存层
//!
//! 通过插件注册表选择后端（`moka` 进程内缓存或 `redis`）。

pub mod object_cache;
pub mod register;
pub mod traits;

pub use traits::{CacheResult, ObjectCache};

/// 声明缓存插件
///
/// 为类型生成 `register()` 函数，调用后把构造器写入全局注册表。
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:expr, $ty:ty) => {
        pub fn register() {
            $crate::cache::register::register_object_cache_plugin(
                $name,
                std::sync::Arc::new(|| -> $crate::cache::register::BoxedObjectCacheFuture {
                    Box::pin(async {
                        let cache = <$ty>::new()
                            .map_err($crate::errors::LmsError::cache_connection)?;
                        Ok::<_, $crate::errors::LmsError>(
                            Box::new(cache) as Box<dyn $crate::cache::ObjectCache>
                        )
                    })
                }),
            );
        }
    };
}

/// 注册内置缓存插件
pub fn register_builtin_plugins() {
    object_cache::moka::register();
    object_cache::redis::register();
}

/// 用户缓存键
pub fn user_cache_key(user_id: i64) -> String {
    format!("user:{user_id}")
}
