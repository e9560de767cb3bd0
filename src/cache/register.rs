//! 缓存后端注册表
//!
//! 各后端通过 `declare_object_cache_plugin!` 在程序启动前注册构造函数，
//! 启动时按配置的 `cache.type` 取出并构造。

use crate::cache::ObjectCache;
use crate::errors::Result;
use once_cell::sync::Lazy;
use std::{
    collections::BTreeMap,
    future::Future,
    pin::Pin,
    sync::{Arc, RwLock},
};

pub type BoxedObjectCacheFuture =
    Pin<Box<dyn Future<Output = Result<Box<dyn ObjectCache>>> + Send>>;
pub type ObjectCacheConstructor = Arc<dyn Fn() -> BoxedObjectCacheFuture + Send + Sync>;

/// 按名称排序，便于日志输出
static CACHE_BACKENDS: Lazy<RwLock<BTreeMap<String, ObjectCacheConstructor>>> =
    Lazy::new(|| RwLock::new(BTreeMap::new()));

pub fn register_object_cache_plugin<S: Into<String>>(name: S, constructor: ObjectCacheConstructor) {
    let name = name.into().to_ascii_lowercase();
    let mut backends = CACHE_BACKENDS
        .write()
        .expect("Cache registry lock poisoned");
    backends.insert(name, constructor);
}

/// 查找后端，名称不区分大小写
pub fn get_object_cache_plugin(name: &str) -> Option<ObjectCacheConstructor> {
    CACHE_BACKENDS
        .read()
        .expect("Cache registry lock poisoned")
        .get(&name.trim().to_ascii_lowercase())
        .cloned()
}

/// 已注册的后端名称
pub fn registered_backends() -> Vec<String> {
    CACHE_BACKENDS
        .read()
        .expect("Cache registry lock poisoned")
        .keys()
        .cloned()
        .collect()
}

pub fn debug_object_cache_registry() {
    let backends = registered_backends();
    if backends.is_empty() {
        tracing::debug!("No cache backends registered");
    } else {
        tracing::debug!("Registered cache backends: {}", backends.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moka_backend_registered() {
        assert!(get_object_cache_plugin("moka").is_some());
        assert!(get_object_cache_plugin(" MOKA ").is_some());
        assert!(get_object_cache_plugin("redis").is_none());
        assert!(registered_backends().contains(&"moka".to_string()));
    }
}
