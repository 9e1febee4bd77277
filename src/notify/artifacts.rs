//! Local certificate artifact storage

use std::path::{Path, PathBuf};

use super::errors::{NotifyError, NotifyResult};

/// Directory certificate artifacts are written to before emailing
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write an artifact, returning its path
    pub async fn save(&self, file_name: &str, bytes: &[u8]) -> NotifyResult<PathBuf> {
        let name = Path::new(file_name)
            .file_name()
            .ok_or_else(|| NotifyError::Artifact(format!("Invalid file name: {}", file_name)))?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| NotifyError::Artifact(format!("Failed to create {}: {}", self.dir.display(), e)))?;

        let path = self.dir.join(name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| NotifyError::Artifact(format!("Failed to write {}: {}", path.display(), e)))?;
        Ok(path)
    }
}
