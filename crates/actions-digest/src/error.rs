use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DigestError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid step dump: {0}")]
    Json(#[from] serde_json::Error),

    #[error("clipboard write via {tool} failed: {reason}")]
    Clipboard { tool: String, reason: String },

    #[error("failed to write {}: {source}", path.display())]
    Download {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, DigestError>;
