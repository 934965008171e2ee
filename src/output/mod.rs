use std::path::{Path, PathBuf};

use tracing::info;

use crate::dockerfile::RenderedArtifact;
use crate::error::{CnImageError, Result};
use crate::reference::ImageReference;

/// `./<distro>-<version>.Dockerfile`, used when no output path is given.
pub fn default_output_path(reference: &ImageReference) -> PathBuf {
    PathBuf::from(format!(
        "./{}-{}.Dockerfile",
        reference.distro(),
        reference.version()
    ))
}

/// Write `artifact` to `path`, replacing any existing file.
pub async fn write_artifact(path: &Path, artifact: &RenderedArtifact) -> Result<()> {
    tokio::fs::write(path, artifact.to_string())
        .await
        .map_err(|source| CnImageError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    info!(path = %path.display(), "wrote dockerfile");
    Ok(())
}
