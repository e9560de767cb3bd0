//! 本地文件系统对象存储

use std::path::PathBuf;

use tokio::io::AsyncWriteExt;

use super::{BlobStore, validate_object_path};
use crate::errors::{EvalHubError, Result};

/// 以 `{root}/{bucket}/{path}` 存放对象
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|e| {
            EvalHubError::blob_storage(format!("创建存储目录失败 {}: {e}", root.display()))
        })?;

        Ok(Self {
            root,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn object_path(&self, bucket: &str, path: &str) -> Result<PathBuf> {
        validate_object_path(bucket, path)?;
        Ok(self.root.join(bucket).join(path))
    }
}

#[async_trait::async_trait]
impl BlobStore for LocalBlobStore {
    async fn put_new(&self, bucket: &str, path: &str, bytes: &[u8]) -> Result<bool> {
        let target = self.object_path(bucket, path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| EvalHubError::blob_storage(format!("创建目录失败: {e}")))?;
        }

        let mut file = match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
            .await
        {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(false),
            Err(e) => {
                return Err(EvalHubError::blob_storage(format!(
                    "写入对象失败 {bucket}/{path}: {e}"
                )));
            }
        };

        let written: std::io::Result<()> = async {
            file.write_all(bytes).await?;
            file.flush().await
        }
        .await;

        if let Err(e) = written {
            let _ = tokio::fs::remove_file(&target).await;
            return Err(EvalHubError::blob_storage(format!(
                "写入对象失败 {bucket}/{path}: {e}"
            )));
        }

        tracing::debug!("Stored object {}/{} ({} bytes)", bucket, path, bytes.len());
        Ok(true)
    }

    async fn get(&self, bucket: &str, path: &str) -> Result<Option<Vec<u8>>> {
        let target = self.object_path(bucket, path)?;
        match tokio::fs::read(&target).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(EvalHubError::blob_storage(format!(
                "读取对象失败 {bucket}/{path}: {e}"
            ))),
        }
    }

    async fn delete(&self, bucket: &str, path: &str) -> Result<bool> {
        let target = self.object_path(bucket, path)?;
        match tokio::fs::remove_file(&target).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(EvalHubError::blob_storage(format!(
                "删除对象失败 {bucket}/{path}: {e}"
            ))),
        }
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/{bucket}/{path}", self.public_base_url)
    }
}

/// 根据扩展名推断 Content-Type
pub fn content_type_for(path: &str) -> &'static str {
    match super::file_extension(path).as_str() {
        "txt" | "md" => "text/plain; charset=utf-8",
        "html" | "htm" => "text/html; charset=utf-8",
        "json" => "application/json",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::upload_unique;

    #[tokio::test]
    async fn test_put_new_does_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path(), "http://localhost:8080/storage/").unwrap();

        assert!(store.put_new("signatures", "signatures/a.png", b"one").await.unwrap());
        assert!(!store.put_new("signatures", "signatures/a.png", b"two").await.unwrap());
        assert_eq!(
            store.get("signatures", "signatures/a.png").await.unwrap(),
            Some(b"one".to_vec())
        );
        assert_eq!(
            store.public_url("signatures", "signatures/a.png"),
            "http://localhost:8080/storage/signatures/signatures/a.png"
        );
    }

    #[tokio::test]
    async fn test_upload_unique_suffixes_on_collision() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path(), "http://localhost/storage").unwrap();

        let first = upload_unique(&store, "assignment-files", "assignments", "100", "txt", b"a")
            .await
            .unwrap();
        let second = upload_unique(&store, "assignment-files", "assignments", "100", "txt", b"b")
            .await
            .unwrap();

        assert_eq!(first, "assignments/100.txt");
        assert_ne!(first, second);
        assert!(second.starts_with("assignments/100-") && second.ends_with(".txt"));
        assert!(store.delete("assignment-files", &first).await.unwrap());
        assert!(store.get("assignment-files", &first).await.unwrap().is_none());
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("a/b.PNG"), "image/png");
        assert_eq!(content_type_for("a/b"), "application/octet-stream");
    }
}
