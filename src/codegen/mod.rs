use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

pub mod descriptor;
pub mod plan;
pub mod script;

/// Artifact write failures. Rendering itself is infallible; only the final
/// filesystem write can go wrong.
#[derive(Debug, Error)]
pub enum CodegenError {
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Outcome of one artifact write, logged and reported to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactRecord {
    pub path: PathBuf,
    pub bytes: usize,
    /// SHA-1 of the artifact text. Generation is deterministic, so the same
    /// signature and header reproduce the same fingerprint across runs.
    pub fingerprint: String,
}

/// Write rendered artifact text and record what landed on disk.
pub fn write_artifact(path: &Path, content: &str) -> Result<ArtifactRecord, CodegenError> {
    std::fs::write(path, content).map_err(|source| CodegenError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(ArtifactRecord {
        path: path.to_path_buf(),
        bytes: content.len(),
        fingerprint: text_fingerprint(content),
    })
}

pub fn text_fingerprint(text: &str) -> String {
    use sha1::{Digest, Sha1};

    let mut hasher = Sha1::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}
