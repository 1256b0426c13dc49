//! Static file resolution under a configured root directory.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, warn};

use crate::error::{Result, ServerError};
use crate::http::mime;
use percent_encoding::percent_decode_str;

const INDEX_FILE: &str = "index.html";

/// A file read from the static root, ready to be sent.
#[derive(Debug, Clone)]
pub struct StaticFile {
    /// Canonical location on disk
    pub path: PathBuf,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

/// Resolves URL paths to files below a single root directory.
#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
}

impl StaticFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reads the file a URL path refers to.
    ///
    /// `url_path` is relative to the root and already stripped of any
    /// namespace prefix. Empty and `/` mean `index.html`, as does any
    /// directory. Paths that leave the root after canonicalization, paths
    /// that do not exist and non-regular files all give
    /// [`ServerError::NotFound`]. Failing to read an existing file is
    /// [`ServerError::Io`].
    pub async fn resolve(&self, url_path: &str) -> Result<StaticFile> {
        // '+' is literal in paths
        let decoded = percent_decode_str(url_path).decode_utf8_lossy();
        let relative = decoded.trim_start_matches('/');

        if relative.contains('\0') {
            return Err(ServerError::NotFound);
        }

        let relative = if relative.is_empty() { INDEX_FILE } else { relative };

        let root = match fs::canonicalize(&self.root).await {
            Ok(root) => root,
            Err(e) => {
                warn!(
                    root = %self.root.display(),
                    error = %e,
                    "Static root not found or inaccessible"
                );
                return Err(ServerError::NotFound);
            }
        };

        let mut path = contained(&root, &root.join(relative), url_path).await?;
        let mut metadata = fs::metadata(&path).await?;

        if metadata.is_dir() {
            path = contained(&root, &path.join(INDEX_FILE), url_path).await?;
            metadata = fs::metadata(&path).await?;
        }

        if !metadata.is_file() {
            return Err(ServerError::NotFound);
        }

        let body = fs::read(&path).await?;
        let content_type = mime::content_type_for_path(&path);

        debug!(
            file = %path.display(),
            bytes = body.len(),
            content_type,
            "Resolved static file"
        );

        Ok(StaticFile {
            path,
            content_type,
            body,
        })
    }
}

/// Canonicalizes `candidate` and checks it is still below `root`.
async fn contained(root: &Path, candidate: &Path, url_path: &str) -> Result<PathBuf> {
    // Missing files, and things like "file.txt/child", are plain 404s
    let Ok(canonical) = fs::canonicalize(candidate).await else {
        return Err(ServerError::NotFound);
    };

    if !canonical.starts_with(root) {
        warn!(
            path = url_path,
            resolved = %canonical.display(),
            "Path traversal attempt blocked"
        );
        return Err(ServerError::NotFound);
    }

    Ok(canonical)
}
