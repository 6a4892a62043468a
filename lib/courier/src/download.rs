//! Download sinks.
//!
//! [`Client::download`](crate::Client::download) fetches a URL and hands the
//! bytes to a [`SaveSink`], which decides where they end up.

use std::future::Future;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use tracing::debug;

use crate::{Error, Result};

/// Saves a named byte stream.
pub trait SaveSink: Send + Sync {
    /// Save `bytes` under `filename`.
    fn save(&self, filename: &str, bytes: Bytes) -> impl Future<Output = Result<()>> + Send;
}

/// Writes downloads into a directory.
///
/// Only the final component of the requested filename is kept, so a download
/// can never escape the directory.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    /// Sink writing into `dir`, created on first save when missing.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where `filename` would be written.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRequest`] when `filename` has no final component.
    pub fn target(&self, filename: &str) -> Result<PathBuf> {
        let name = Path::new(filename)
            .file_name()
            .ok_or_else(|| Error::invalid_request(format!("invalid download filename: {filename:?}")))?;
        Ok(self.dir.join(name))
    }
}

impl SaveSink for FileSink {
    async fn save(&self, filename: &str, bytes: Bytes) -> Result<()> {
        let target = self.target(filename)?;
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(&target, &bytes).await?;
        debug!(path = %target.display(), size = bytes.len(), "download saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};

    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("courier-{name}-{}", std::process::id()))
    }

    #[test]
    fn target_keeps_file_name_only() {
        let sink = FileSink::new("/downloads");
        check!(sink.target("report.pdf").expect("target") == Path::new("/downloads/report.pdf"));
        check!(sink.target("../../etc/passwd").expect("target") == Path::new("/downloads/passwd"));

        let_assert!(Err(Error::InvalidRequest(_)) = sink.target(".."));
    }

    #[tokio::test]
    async fn writes_bytes() {
        let dir = scratch_dir("sink");
        let sink = FileSink::new(&dir);

        sink.save("hello.txt", Bytes::from_static(b"hello"))
            .await
            .expect("save");

        let written = tokio::fs::read(dir.join("hello.txt")).await.expect("read");
        check!(written == b"hello");

        tokio::fs::remove_dir_all(&dir).await.expect("cleanup");
    }
}
