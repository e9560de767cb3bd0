//! 对象缓存
//!
//! 缓存后端以插件形式在程序加载时注册，启动时按配置中的类型创建。

pub mod object_cache;
pub mod register;
mod traits;

pub use traits::{CacheResult, ObjectCache};

/// 声明并注册一个缓存插件
///
/// 类型需要提供 `fn new() -> Result<Self, String>`。
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:literal, $ty:ty) => {
        #[ctor::ctor]
        unsafe fn __register_object_cache_plugin() {
            let constructor: $crate::cache::register::ObjectCacheConstructor =
                std::sync::Arc::new(|| {
                    Box::pin(async {
                        let cache = <$ty>::new()
                            .map_err($crate::errors::EvalHubError::cache_connection)?;
                        Ok::<Box<dyn $crate::cache::ObjectCache>, $crate::errors::EvalHubError>(
                            Box::new(cache),
                        )
                    }) as $crate::cache::register::BoxedObjectCacheFuture
                });
            $crate::cache::register::register_object_cache_plugin($name, constructor);
        }
    };
}
