//! JSON-snapshot similarity index
//!
//! Same ranking as the in-memory index; every mutation rewrites
//! `{dir}/{collection}.json` so the collection survives restarts.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::in_memory::{InMemorySimilarityIndex, StoredRow};
use crate::domain::embedding::EmbeddingProvider;
use crate::domain::knowledge_base::{IndexGetResult, IndexQueryResult, Metadata, SimilarityIndex};
use crate::domain::DomainError;

const INDEX_TYPE: &str = "json_file";

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    collection: String,
    embedding_provider: String,
    dimensions: usize,
    rows: Vec<StoredRow>,
}

/// File-backed index built on the in-memory index
#[derive(Debug)]
pub struct JsonFileSimilarityIndex {
    inner: InMemorySimilarityIndex,
    embedder: Arc<dyn EmbeddingProvider>,
    dir: PathBuf,
    file: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileSimilarityIndex {
    /// Open (or create) the collection snapshot under `dir`
    pub async fn open(
        dir: impl AsRef<Path>,
        collection_name: impl Into<String>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self, DomainError> {
        let collection_name = collection_name.into();
        let dir = dir.as_ref().to_path_buf();
        let file = dir.join(format!("{}.json", collection_name));

        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            DomainError::index(
                INDEX_TYPE,
                format!("Failed to create index directory {}: {}", dir.display(), e),
            )
        })?;

        let index = Self {
            inner: InMemorySimilarityIndex::new(collection_name, embedder.clone()),
            embedder,
            dir,
            file,
            write_lock: Mutex::new(()),
        };

        index.load().await?;
        Ok(index)
    }

    /// Path of the snapshot file
    pub fn file_path(&self) -> &Path {
        &self.file
    }

    async fn load(&self) -> Result<(), DomainError> {
        let bytes = match tokio::fs::read(&self.file).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No snapshot at {}, starting empty", self.file.display());
                return Ok(());
            }
            Err(e) => {
                return Err(DomainError::index(
                    INDEX_TYPE,
                    format!("Failed to read {}: {}", self.file.display(), e),
                ));
            }
        };

        let snapshot: Snapshot = serde_json::from_slice(&bytes).map_err(|e| {
            DomainError::index(
                INDEX_TYPE,
                format!("Corrupt snapshot {}: {}", self.file.display(), e),
            )
        })?;

        if snapshot.embedding_provider != self.embedder.provider_name()
            || snapshot.dimensions != self.embedder.dimensions()
        {
            return Err(DomainError::index(
                INDEX_TYPE,
                format!(
                    "Snapshot {} was built with {} ({} dims), current provider is {} ({} dims)",
                    self.file.display(),
                    snapshot.embedding_provider,
                    snapshot.dimensions,
                    self.embedder.provider_name(),
                    self.embedder.dimensions()
                ),
            ));
        }

        info!(
            collection = %snapshot.collection,
            rows = snapshot.rows.len(),
            "Loaded index snapshot"
        );
        self.inner.restore(snapshot.rows).await;
        Ok(())
    }

    async fn persist(&self) -> Result<(), DomainError> {
        let _guard = self.write_lock.lock().await;
        self.write_snapshot().await
    }

    /// Callers hold `write_lock`
    async fn write_snapshot(&self) -> Result<(), DomainError> {
        let snapshot = Snapshot {
            collection: self.inner.collection_name().to_string(),
            embedding_provider: self.embedder.provider_name().to_string(),
            dimensions: self.embedder.dimensions(),
            rows: self.inner.snapshot().await,
        };
        let bytes = serde_json::to_vec(&snapshot)?;

        let tmp = self.file.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await.map_err(|e| {
            DomainError::index(INDEX_TYPE, format!("Failed to write {}: {}", tmp.display(), e))
        })?;
        tokio::fs::rename(&tmp, &self.file).await.map_err(|e| {
            DomainError::index(
                INDEX_TYPE,
                format!("Failed to replace {}: {}", self.file.display(), e),
            )
        })?;

        debug!(file = %self.file.display(), rows = snapshot.rows.len(), "Persisted index snapshot");
        Ok(())
    }
}

#[async_trait]
impl SimilarityIndex for JsonFileSimilarityIndex {
    fn index_type(&self) -> &'static str {
        INDEX_TYPE
    }

    fn collection_name(&self) -> &str {
        self.inner.collection_name()
    }

    async fn add(
        &self,
        contents: Vec<String>,
        metadatas: Vec<Metadata>,
        ids: Vec<String>,
    ) -> Result<(), DomainError> {
        let _guard = self.write_lock.lock().await;
        let previous = self.inner.snapshot().await;

        self.inner.add(contents, metadatas, ids).await?;
        if let Err(e) = self.write_snapshot().await {
            warn!(error = %e, "Snapshot write failed, rolling back added rows");
            self.inner.restore(previous).await;
            return Err(e);
        }
        Ok(())
    }

    async fn query(&self, query_text: &str, n_results: usize) -> Result<IndexQueryResult, DomainError> {
        self.inner.query(query_text, n_results).await
    }

    async fn get(&self, limit: Option<usize>) -> Result<IndexGetResult, DomainError> {
        self.inner.get(limit).await
    }

    async fn count(&self) -> Result<usize, DomainError> {
        self.inner.count().await
    }

    async fn create_collection(&self) -> Result<(), DomainError> {
        if tokio::fs::try_exists(&self.file).await.unwrap_or(false) {
            return Ok(());
        }
        self.persist().await
    }

    async fn delete_collection(&self) -> Result<(), DomainError> {
        let _guard = self.write_lock.lock().await;

        match tokio::fs::remove_file(&self.file).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(DomainError::index(
                    INDEX_TYPE,
                    format!("Failed to remove {}: {}", self.file.display(), e),
                ));
            }
        }

        self.inner.delete_collection().await
    }

    async fn heartbeat(&self) -> Result<(), DomainError> {
        let metadata = tokio::fs::metadata(&self.dir).await.map_err(|e| {
            DomainError::index(
                INDEX_TYPE,
                format!("Index directory {} unavailable: {}", self.dir.display(), e),
            )
        })?;

        if !metadata.is_dir() {
            return Err(DomainError::index(
                INDEX_TYPE,
                format!("{} is not a directory", self.dir.display()),
            ));
        }

        Ok(())
    }
}
