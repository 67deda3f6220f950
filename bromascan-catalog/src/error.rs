use std::path::PathBuf;

/// Fatal catalog I/O failures (§7): unreadable files and malformed JSON.
/// Unlike per-method synthesis/scan failures, these abort the whole run.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("unknown platform in catalog: {0}")]
    UnknownPlatform(String),
}
