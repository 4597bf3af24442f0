//! File output, the command-line counterpart of a browser download.

use crate::error::{DigestError, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// Write `bytes` to `dir/name`, creating `dir` as needed. An existing file of
/// the same name is replaced.
pub async fn save(dir: &Path, name: &str, bytes: &[u8], mime: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    let fail = |source| DigestError::Download {
        path: path.clone(),
        source,
    };

    tokio::fs::create_dir_all(dir).await.map_err(fail)?;
    tokio::fs::write(&path, bytes).await.map_err(fail)?;

    info!("saved {} ({mime}, {} bytes)", path.display(), bytes.len());
    Ok(path)
}

/// Default directory for saved reports: the user's download folder, else the
/// current directory.
pub fn default_download_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}
