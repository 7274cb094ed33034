//! FS Voice Store - 文件系统音色存储实现
//!
//! 实现 VoiceStorePort trait。文件布局:
//!
//! <voices_dir>/<voice_id>/
//!   reference.<ext>   参考音频副本
//!   embedding.bin     引擎工件（可选）
//!   voice.json        元数据 sidecar

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::application::ports::{StoreError, VoiceStorePort};
use crate::domain::voice::{Voice, VoiceId};

const SIDECAR_FILE: &str = "voice.json";
const EMBEDDING_FILE: &str = "embedding.bin";

/// 文件系统音色存储
pub struct FsVoiceStore {
    /// 存储根目录
    base_dir: PathBuf,
}

impl FsVoiceStore {
    /// 创建新的文件存储
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let base_dir = base_dir.as_ref().to_path_buf();

        // 确保目录存在
        fs::create_dir_all(&base_dir).await?;

        Ok(Self { base_dir })
    }

    /// 存储根目录
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    async fn read_sidecar(path: &Path) -> Result<Voice, StoreError> {
        let data = fs::read(path).await?;
        serde_json::from_slice(&data).map_err(|e| {
            StoreError::InvalidSidecar(format!("{}: {}", path.display(), e))
        })
    }
}

#[async_trait]
impl VoiceStorePort for FsVoiceStore {
    fn voice_dir(&self, id: &VoiceId) -> PathBuf {
        self.base_dir.join(id.to_string())
    }

    async fn import_reference(
        &self,
        id: &VoiceId,
        source: &Path,
    ) -> Result<PathBuf, StoreError> {
        let dir = self.voice_dir(id);
        fs::create_dir_all(&dir).await?;

        let ext = source
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("wav");
        let dest = dir.join(format!("reference.{}", ext));

        fs::copy(source, &dest).await?;

        tracing::debug!(
            voice_id = %id,
            source = %source.display(),
            dest = %dest.display(),
            "Reference audio imported"
        );

        Ok(dest)
    }

    async fn write_embedding(&self, id: &VoiceId, data: &[u8]) -> Result<PathBuf, StoreError> {
        let dir = self.voice_dir(id);
        fs::create_dir_all(&dir).await?;

        let path = dir.join(EMBEDDING_FILE);
        fs::write(&path, data).await?;

        tracing::debug!(voice_id = %id, size = data.len(), "Embedding saved");

        Ok(path)
    }

    async fn save(&self, voice: &Voice) -> Result<(), StoreError> {
        let dir = self.voice_dir(voice.id());
        fs::create_dir_all(&dir).await?;

        let data = serde_json::to_vec_pretty(voice)
            .map_err(|e| StoreError::InvalidSidecar(e.to_string()))?;

        // 先写临时文件再改名，避免读到半个 sidecar
        let tmp = dir.join(format!("{}.tmp", SIDECAR_FILE));
        fs::write(&tmp, &data).await?;
        fs::rename(&tmp, dir.join(SIDECAR_FILE)).await?;

        tracing::debug!(voice_id = %voice.id(), "Sidecar saved");

        Ok(())
    }

    async fn load(&self, id: &VoiceId) -> Result<Voice, StoreError> {
        let path = self.voice_dir(id).join(SIDECAR_FILE);
        if !path.exists() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Self::read_sidecar(&path).await
    }

    async fn load_dir(&self, dir: &Path) -> Result<Voice, StoreError> {
        let path = dir.join(SIDECAR_FILE);
        if !path.exists() {
            return Err(StoreError::NotFound(dir.display().to_string()));
        }
        Self::read_sidecar(&path).await
    }

    async fn list(&self) -> Result<Vec<Voice>, StoreError> {
        let mut voices = Vec::new();
        let mut entries = fs::read_dir(&self.base_dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let sidecar = entry.path().join(SIDECAR_FILE);
            if !sidecar.exists() {
                continue;
            }
            match Self::read_sidecar(&sidecar).await {
                Ok(voice) => voices.push(voice),
                Err(e) => {
                    tracing::warn!(
                        path = %sidecar.display(),
                        error = %e,
                        "Skipping unreadable sidecar"
                    );
                }
            }
        }

        voices.sort_by_key(|v| v.created_at());
        Ok(voices)
    }

    async fn delete(&self, id: &VoiceId) -> Result<(), StoreError> {
        let dir = self.voice_dir(id);
        if dir.exists() {
            fs::remove_dir_all(&dir).await?;
            tracing::info!(voice_id = %id, "Voice directory deleted");
        }
        Ok(())
    }

    async fn exists(&self, id: &VoiceId) -> bool {
        self.voice_dir(id).join(SIDECAR_FILE).exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::voice::{AudioRef, EngineName, VoiceName};
    use tempfile::tempdir;

    async fn store_with_voice() -> (tempfile::TempDir, FsVoiceStore, Voice) {
        let temp = tempdir().unwrap();
        let store = FsVoiceStore::new(temp.path().join("voices")).await.unwrap();

        let source = temp.path().join("sample.wav");
        std::fs::write(&source, b"RIFFdata").unwrap();

        let id = VoiceId::new();
        let reference = store.import_reference(&id, &source).await.unwrap();
        let voice = Voice::new(
            id,
            VoiceName::new("demo").unwrap(),
            AudioRef::from_path(reference).unwrap(),
            EngineName::GptSovits,
        );
        store.save(&voice).await.unwrap();

        (temp, store, voice)
    }

    #[tokio::test]
    async fn test_save_and_load_roundtrip() {
        let (_temp, store, voice) = store_with_voice().await;

        assert!(store.exists(voice.id()).await);

        let loaded = store.load(voice.id()).await.unwrap();
        assert_eq!(loaded.id(), voice.id());
        assert_eq!(loaded.name().as_str(), "demo");
        assert!(loaded.reference_audio().path().exists());
    }

    #[tokio::test]
    async fn test_load_dir() {
        let (_temp, store, voice) = store_with_voice().await;

        let loaded = store.load_dir(&store.voice_dir(voice.id())).await.unwrap();
        assert_eq!(loaded.id(), voice.id());
    }

    #[tokio::test]
    async fn test_load_missing_is_not_found() {
        let temp = tempdir().unwrap();
        let store = FsVoiceStore::new(temp.path()).await.unwrap();

        let err = store.load(&VoiceId::new()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_import_reference_keeps_extension() {
        let temp = tempdir().unwrap();
        let store = FsVoiceStore::new(temp.path().join("voices")).await.unwrap();

        let source = temp.path().join("sample.mp3");
        std::fs::write(&source, b"mp3data").unwrap();

        let dest = store
            .import_reference(&VoiceId::new(), &source)
            .await
            .unwrap();
        assert!(dest.ends_with("reference.mp3"));
        assert_eq!(std::fs::read(&dest).unwrap(), b"mp3data");
    }

    #[tokio::test]
    async fn test_embedding_write() {
        let temp = tempdir().unwrap();
        let store = FsVoiceStore::new(temp.path()).await.unwrap();

        let id = VoiceId::new();
        let path = store.write_embedding(&id, &[7u8; 16]).await.unwrap();
        assert!(path.ends_with(EMBEDDING_FILE));
        assert_eq!(std::fs::read(&path).unwrap(), vec![7u8; 16]);
    }

    #[tokio::test]
    async fn test_list_and_delete() {
        let (_temp, store, voice) = store_with_voice().await;

        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id(), voice.id());

        store.delete(voice.id()).await.unwrap();
        assert!(!store.exists(voice.id()).await);
        assert!(store.list().await.unwrap().is_empty());

        // 重复删除是幂等的
        store.delete(voice.id()).await.unwrap();
    }
}
