//! Source tarball downloads.
//!
//! Downloads are written to `<dest>.part` and renamed into place once the
//! body has been fully received, so a partially downloaded tarball never sits
//! at the final path.

use std::future::Future;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Errors that can occur while downloading a file.
#[derive(Debug, Error)]
pub enum FetchError {
  /// HTTP request failed before or during the body transfer.
  #[error("request to {url} failed: {message}")]
  Request { url: String, message: String },

  /// Server answered with a non-success status.
  #[error("{url} returned HTTP {status}")]
  Status { url: String, status: u16 },

  /// Writing the downloaded bytes failed.
  #[error("failed to write {path}: {source}")]
  Write {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

/// Downloads a URL to a file.
pub trait Fetcher {
  fn download(&self, url: &str, dest: &Path) -> impl Future<Output = Result<(), FetchError>> + Send;
}

/// [`Fetcher`] backed by `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
  client: reqwest::Client,
}

impl HttpFetcher {
  pub fn new() -> Self {
    Self::default()
  }
}

impl Fetcher for HttpFetcher {
  async fn download(&self, url: &str, dest: &Path) -> Result<(), FetchError> {
    info!(url = %url, "downloading");

    let request_err = |e: reqwest::Error| FetchError::Request {
      url: url.to_string(),
      message: e.to_string(),
    };

    let mut response = self.client.get(url).send().await.map_err(request_err)?;

    if !response.status().is_success() {
      return Err(FetchError::Status {
        url: url.to_string(),
        status: response.status().as_u16(),
      });
    }

    let partial = partial_path(dest);
    let write_err = |source: std::io::Error| FetchError::Write {
      path: partial.clone(),
      source,
    };

    let mut file = fs::File::create(&partial).await.map_err(write_err)?;
    let mut written: u64 = 0;

    while let Some(chunk) = response.chunk().await.map_err(request_err)? {
      file.write_all(&chunk).await.map_err(write_err)?;
      written += chunk.len() as u64;
    }
    file.flush().await.map_err(write_err)?;
    drop(file);

    fs::rename(&partial, dest).await.map_err(|source| FetchError::Write {
      path: dest.to_path_buf(),
      source,
    })?;

    debug!(path = ?dest, size = written, "download complete");
    Ok(())
  }
}

/// Temporary path a download is streamed into before the final rename.
pub fn partial_path(dest: &Path) -> PathBuf {
  let mut name = dest.file_name().map(|n| n.to_os_string()).unwrap_or_default();
  name.push(".part");
  dest.with_file_name(name)
}
