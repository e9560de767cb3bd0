//! 对象存储
//!
//! 提交文件与签名图片都存放在按 bucket 划分的对象存储中，通过公开 URL 访问。

mod local;

pub use local::{LocalBlobStore, content_type_for};

use std::path::Path;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::errors::{EvalHubError, Result};

/// 提交文件 bucket
pub const SUBMISSION_BUCKET: &str = "assignment-files";
/// 签名图片 bucket
pub const SIGNATURE_BUCKET: &str = "signatures";

#[async_trait::async_trait]
pub trait BlobStore: Send + Sync {
    /// 写入新对象，路径已存在时返回 false 且不覆盖
    async fn put_new(&self, bucket: &str, path: &str, bytes: &[u8]) -> Result<bool>;
    /// 读取对象
    async fn get(&self, bucket: &str, path: &str) -> Result<Option<Vec<u8>>>;
    /// 删除对象
    async fn delete(&self, bucket: &str, path: &str) -> Result<bool>;
    /// 对象的公开访问地址
    fn public_url(&self, bucket: &str, path: &str) -> String;
}

pub fn create_blob_store() -> Result<Arc<dyn BlobStore>> {
    let config = AppConfig::get();
    let store = LocalBlobStore::new(&config.upload.dir, &config.upload.public_base_url)?;
    Ok(Arc::new(store))
}

/// 取文件扩展名（小写），缺省为 bin
pub fn file_extension(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_else(|| "bin".to_string())
}

/// 以 `{prefix}/{stem}.{ext}` 写入，冲突时追加 UUID 后缀，返回最终路径
pub async fn upload_unique(
    store: &dyn BlobStore,
    bucket: &str,
    prefix: &str,
    stem: &str,
    ext: &str,
    bytes: &[u8],
) -> Result<String> {
    let path = format!("{prefix}/{stem}.{ext}");
    if store.put_new(bucket, &path, bytes).await? {
        return Ok(path);
    }

    let path = format!("{prefix}/{stem}-{}.{ext}", uuid::Uuid::new_v4());
    if store.put_new(bucket, &path, bytes).await? {
        return Ok(path);
    }

    Err(EvalHubError::blob_storage(format!(
        "Object already exists: {bucket}/{path}"
    )))
}

/// 检查 bucket 与路径只包含普通片段
pub(crate) fn validate_object_path(bucket: &str, path: &str) -> Result<()> {
    let valid_segment =
        |s: &str| !s.is_empty() && s != "." && s != ".." && !s.contains('\\') && !s.contains('\0');

    if !valid_segment(bucket) || bucket.contains('/') {
        return Err(EvalHubError::validation(format!("Invalid bucket: {bucket}")));
    }
    if path.starts_with('/') || !path.split('/').all(valid_segment) {
        return Err(EvalHubError::validation(format!("Invalid object path: {path}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("essay.PDF"), "pdf");
        assert_eq!(file_extension("notes"), "bin");
        assert_eq!(file_extension("archive.tar.gz"), "gz");
        assert_eq!(file_extension("weird.p$f"), "bin");
    }

    #[test]
    fn test_validate_object_path() {
        assert!(validate_object_path("assignment-files", "assignments/1.txt").is_ok());
        assert!(validate_object_path("assignment-files", "../etc/passwd").is_err());
        assert!(validate_object_path("assignment-files", "/abs.txt").is_err());
        assert!(validate_object_path("a/b", "x.txt").is_err());
        assert!(validate_object_path("signatures", "signatures//x.png").is_err());
    }
}
