use crate::ai::{ChatCompletion, HttpTextFetcher, OpenAiChatClient, TextFetcher};
use crate::blob::{self, BlobStore};
use crate::cache::{
    ObjectCache,
    register::{get_object_cache_plugin, registered_backends},
};
use crate::config::AppConfig;
use crate::pipeline::EvaluationPipeline;
use crate::storage::Storage;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
    pub blobs: Arc<dyn BlobStore>,
    pub pipeline: Arc<EvaluationPipeline>,
}

/// 创建缓存实例
async fn create_cache() -> Result<Arc<dyn ObjectCache>, Box<dyn std::error::Error>> {
    let config = AppConfig::get();
    let cache_type = &config.cache.cache_type;

    warn!("Attempting to create {} cache backend", cache_type);

    if let Some(constructor) = get_object_cache_plugin(cache_type) {
        match constructor().await {
            Ok(cache) => {
                warn!("Successfully created {} cache backend", cache_type);
                return Ok(Arc::from(cache));
            }
            Err(e) => warn!("Failed to create {} cache: {}", cache_type, e),
        }
    } else {
        warn!(
            "Cache backend '{}' not found in registry (available: {})",
            cache_type,
            registered_backends().join(", ")
        );
    }

    // 回退到默认的内存缓存
    if cache_type != "moka" {
        warn!("Falling back to default memory cache");
        if let Some(fallback_constructor) = get_object_cache_plugin("moka") {
            match fallback_constructor().await {
                Ok(cache) => {
                    warn!("Successfully created fallback Moka (in-memory) cache backend");
                    return Ok(Arc::from(cache));
                }
                Err(fallback_e) => {
                    warn!("Failed to create fallback Moka cache: {}", fallback_e);
                }
            }
        }
    }

    Err(format!("No cache backend available (tried: {cache_type})").into())
}

/// 创建 AI 客户端
fn create_ai_clients() -> crate::errors::Result<(Arc<dyn ChatCompletion>, Arc<dyn TextFetcher>)> {
    let config = AppConfig::get();
    let chat = OpenAiChatClient::from_config(&config.ai)?;
    let fetcher = HttpTextFetcher::new(config.ai.request_timeout)?;
    if config.ai_configured() {
        info!(
            "AI client configured (model: {}, base url: {})",
            config.ai.model, config.ai.base_url
        );
    } else {
        warn!("AI API key is not configured, AI features will fail until it is set");
    }
    Ok((Arc::new(chat), Arc::new(fetcher)))
}

/// 准备服务器启动的上下文
/// 包括存储、缓存、对象存储和评测流水线
pub async fn prepare_server_startup() -> StartupContext {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    if cfg!(debug_assertions) {
        crate::cache::register::debug_object_cache_registry();
        debug!("Debug mode: Cache registry is enabled");
    }

    let storage = crate::storage::create_storage()
        .await
        .expect("Failed to create storage backend");
    warn!("Storage backend initialized and migrations completed");

    let cache = create_cache().await.expect("Failed to create cache");
    warn!("Cache backend initialized");

    let blobs = blob::create_blob_store().expect("Failed to create blob store");
    warn!("Blob store initialized at {}", AppConfig::get().upload.dir);

    let (chat, fetcher) = create_ai_clients().expect("Failed to create AI clients");

    let pipeline = Arc::new(EvaluationPipeline::new(
        storage.clone(),
        blobs.clone(),
        chat,
        fetcher,
    ));

    StartupContext {
        storage,
        cache,
        blobs,
        pipeline,
    }
}
