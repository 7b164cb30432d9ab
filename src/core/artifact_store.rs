// src/core/artifact_store.rs
//! Staging area for generated documents.

use crate::core::sanitizer::artifact_stem;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

/// Names every file produced by one generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactKey {
    stem: String,
    request_id: String,
}

impl ArtifactKey {
    /// Fresh key for a submitter; the request id keeps concurrent requests
    /// for the same name from sharing files.
    pub fn for_submitter(name: Option<&str>) -> Self {
        Self {
            stem: artifact_stem(name.unwrap_or_default()),
            request_id: Uuid::new_v4().simple().to_string(),
        }
    }

    pub fn stem(&self) -> &str {
        &self.stem
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Base name shared by the source and every compiler output.
    pub fn job_name(&self) -> String {
        format!("{}_resume_{}", self.stem, self.request_id)
    }

    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{}", self.job_name(), extension)
    }
}

/// Injected storage for staged artifacts.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    async fn put(&self, name: &str, bytes: &[u8]) -> io::Result<()>;

    /// `Ok(None)` when the artifact does not exist.
    async fn get(&self, name: &str) -> io::Result<Option<Vec<u8>>>;

    async fn exists(&self, name: &str) -> io::Result<bool>;

    async fn remove(&self, name: &str) -> io::Result<()>;

    /// Delete artifacts last written before `now - max_age`; returns how many.
    async fn remove_older_than(&self, max_age: Duration) -> io::Result<usize>;

    /// Directory an external process can write outputs into, if the store
    /// is backed by the filesystem.
    fn local_dir(&self) -> Option<&Path>;
}

fn validate_name(name: &str) -> io::Result<()> {
    let single_component = !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(['/', '\\'])
        && name != "..";
    if single_component {
        Ok(())
    } else {
        Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid artifact name: {}", name),
        ))
    }
}

fn cutoff(max_age: Duration) -> DateTime<Utc> {
    let age = chrono::Duration::from_std(max_age).unwrap_or(chrono::Duration::MAX);
    Utc::now()
        .checked_sub_signed(age)
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Artifacts as plain files in one directory.
pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    /// Open the store, creating the directory if needed.
    pub async fn open(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        if !root.exists() {
            fs::create_dir_all(&root).await?;
            info!("Created staging directory: {}", root.display());
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_of(&self, name: &str) -> io::Result<PathBuf> {
        validate_name(name)?;
        Ok(self.root.join(name))
    }
}

#[async_trait]
impl ArtifactStore for FsArtifactStore {
    async fn put(&self, name: &str, bytes: &[u8]) -> io::Result<()> {
        let path = self.path_of(name)?;
        fs::write(&path, bytes).await?;
        debug!("Written artifact: {}", path.display());
        Ok(())
    }

    async fn get(&self, name: &str) -> io::Result<Option<Vec<u8>>> {
        let path = self.path_of(name)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn exists(&self, name: &str) -> io::Result<bool> {
        let path = self.path_of(name)?;
        fs::try_exists(&path).await
    }

    async fn remove(&self, name: &str) -> io::Result<()> {
        let path = self.path_of(name)?;
        match fs::remove_file(&path).await {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }

    async fn remove_older_than(&self, max_age: Duration) -> io::Result<usize> {
        let cutoff = cutoff(max_age);
        let mut removed = 0;

        let mut entries = fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            // Files may vanish mid-sweep through compiler cleanup or an overlapping sweep.
            let metadata = match entry.metadata().await {
                Ok(metadata) => metadata,
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e),
            };
            if !metadata.is_file() {
                continue;
            }
            let modified: DateTime<Utc> = metadata.modified()?.into();
            if modified >= cutoff {
                continue;
            }
            match fs::remove_file(entry.path()).await {
                Ok(()) => {
                    debug!("Expired artifact: {}", entry.path().display());
                    removed += 1;
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e),
            }
        }

        Ok(removed)
    }

    fn local_dir(&self) -> Option<&Path> {
        Some(&self.root)
    }
}

/// In-process store, used by tests and tools that never shell out.
#[derive(Default)]
pub struct MemoryArtifactStore {
    artifacts: RwLock<HashMap<String, (Vec<u8>, DateTime<Utc>)>>,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.artifacts.read().await.keys().cloned().collect();
        names.sort();
        names
    }

    /// Backdate an artifact, for exercising expiry.
    pub async fn set_written_at(&self, name: &str, written_at: DateTime<Utc>) {
        if let Some(entry) = self.artifacts.write().await.get_mut(name) {
            entry.1 = written_at;
        }
    }
}

#[async_trait]
impl ArtifactStore for MemoryArtifactStore {
    async fn put(&self, name: &str, bytes: &[u8]) -> io::Result<()> {
        validate_name(name)?;
        self.artifacts
            .write()
            .await
            .insert(name.to_string(), (bytes.to_vec(), Utc::now()));
        Ok(())
    }

    async fn get(&self, name: &str) -> io::Result<Option<Vec<u8>>> {
        validate_name(name)?;
        Ok(self
            .artifacts
            .read()
            .await
            .get(name)
            .map(|(bytes, _)| bytes.clone()))
    }

    async fn exists(&self, name: &str) -> io::Result<bool> {
        validate_name(name)?;
        Ok(self.artifacts.read().await.contains_key(name))
    }

    async fn remove(&self, name: &str) -> io::Result<()> {
        validate_name(name)?;
        self.artifacts.write().await.remove(name);
        Ok(())
    }

    async fn remove_older_than(&self, max_age: Duration) -> io::Result<usize> {
        let cutoff = cutoff(max_age);
        let mut artifacts = self.artifacts.write().await;
        let before = artifacts.len();
        artifacts.retain(|_, (_, written_at)| *written_at >= cutoff);
        Ok(before - artifacts.len())
    }

    fn local_dir(&self) -> Option<&Path> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_replaces_spaces_in_file_names() {
        let key = ArtifactKey::for_submitter(Some("Jane Doe"));
        assert_eq!(key.stem(), "Jane_Doe");
        assert!(key.file_name("pdf").starts_with("Jane_Doe_resume_"));
        assert!(key.file_name("pdf").ends_with(".pdf"));
        assert!(!key.file_name("tex").contains(' '));
    }

    #[test]
    fn test_keys_for_same_name_are_distinct() {
        let a = ArtifactKey::for_submitter(Some("Jane Doe"));
        let b = ArtifactKey::for_submitter(Some("Jane Doe"));
        assert_ne!(a.job_name(), b.job_name());
        assert_ne!(a.request_id(), b.request_id());
        assert_eq!(a.stem(), b.stem());
        assert!(a.job_name().ends_with(a.request_id()));
    }

    #[test]
    fn test_key_without_name() {
        let key = ArtifactKey::for_submitter(None);
        assert_eq!(key.stem(), "resume");
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("a_resume_1.pdf").is_ok());
        assert!(validate_name("../x.pdf").is_err());
        assert!(validate_name("dir/x.pdf").is_err());
        assert!(validate_name(".hidden").is_err());
        assert!(validate_name("").is_err());
    }

    #[tokio::test]
    async fn test_fs_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::open(dir.path().join("staging")).await.unwrap();

        assert!(!store.exists("a.tex").await.unwrap());
        store.put("a.tex", b"\\documentclass{article}").await.unwrap();
        assert!(store.exists("a.tex").await.unwrap());
        assert_eq!(
            store.get("a.tex").await.unwrap().as_deref(),
            Some(&b"\\documentclass{article}"[..])
        );
        assert_eq!(store.get("missing.pdf").await.unwrap(), None);
        assert_eq!(store.local_dir(), Some(store.root()));

        store.remove("a.tex").await.unwrap();
        store.remove("a.tex").await.unwrap();
        assert!(!store.exists("a.tex").await.unwrap());
    }

    #[tokio::test]
    async fn test_fs_store_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::open(dir.path()).await.unwrap();
        let err = store.put("../escape.pdf", b"x").await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn test_fs_store_expiry_keeps_fresh_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::open(dir.path()).await.unwrap();
        store.put("fresh.pdf", b"%PDF").await.unwrap();

        let removed = store
            .remove_older_than(Duration::from_secs(3600))
            .await
            .unwrap();
        assert_eq!(removed, 0);
        assert!(store.exists("fresh.pdf").await.unwrap());

        tokio::time::sleep(Duration::from_millis(20)).await;
        let removed = store.remove_older_than(Duration::ZERO).await.unwrap();
        assert_eq!(removed, 1);
        assert!(!store.exists("fresh.pdf").await.unwrap());
    }

    #[tokio::test]
    async fn test_overlapping_sweeps_share_the_work() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::open(dir.path()).await.unwrap();
        for i in 0..50 {
            store.put(&format!("old_{}.pdf", i), b"%PDF").await.unwrap();
        }
        tokio::time::sleep(Duration::from_millis(20)).await;

        let (first, second) = tokio::join!(
            store.remove_older_than(Duration::ZERO),
            store.remove_older_than(Duration::ZERO)
        );
        assert_eq!(first.unwrap() + second.unwrap(), 50);
        assert!(!store.exists("old_0.pdf").await.unwrap());
    }

    #[tokio::test]
    async fn test_memory_store_expiry() {
        let store = MemoryArtifactStore::new();
        store.put("old.pdf", b"1").await.unwrap();
        store.put("new.pdf", b"2").await.unwrap();
        store
            .set_written_at("old.pdf", Utc::now() - chrono::Duration::hours(48))
            .await;

        let removed = store
            .remove_older_than(Duration::from_secs(24 * 3600))
            .await
            .unwrap();

        assert_eq!(removed, 1);
        assert_eq!(store.names().await, vec!["new.pdf".to_string()]);
        assert!(store.local_dir().is_none());
    }
}
