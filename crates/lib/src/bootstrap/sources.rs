//! Upstream source acquisition.
//!
//! A source tree counts as present as soon as its extraction directory
//! exists; nothing checks it against the upstream release.

use std::io;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::consts::{MINGW_W64_REPO, binutils_url, gcc_url};
use crate::error::{Error, Result, create_dir};
use crate::exec::{CommandRunner, CommandSpec, OUTPUT_TAIL_LINES, describe_exit};
use crate::fetch::Fetcher;
use crate::params::BuildParameters;

/// A release tarball and the directory it extracts into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceArchive {
  pub name: &'static str,
  pub url: String,
  pub tarball: PathBuf,
  pub dir: PathBuf,
}

/// The GCC and binutils archives for `params`, in acquisition order.
pub fn gcc_archives(params: &BuildParameters) -> [SourceArchive; 2] {
  let sources = params.sources_dir();
  [
    SourceArchive {
      name: "gcc",
      url: gcc_url(),
      tarball: sources.join("gcc.tar.gz"),
      dir: params.gcc_sources_dir(),
    },
    SourceArchive {
      name: "binutils",
      url: binutils_url(),
      tarball: sources.join("binutils.tar.gz"),
      dir: params.binutils_sources_dir(),
    },
  ]
}

/// Download and unpack `archive` unless it has been unpacked before.
///
/// Returns `true` if the archive was extracted by this call. A tarball left
/// behind by an earlier run is reused instead of downloaded again.
pub async fn acquire_archive<R: CommandRunner, F: Fetcher>(
  runner: &R,
  fetcher: &F,
  archive: &SourceArchive,
) -> Result<bool> {
  let failed = |message: String| Error::SourceAcquisitionFailed {
    artifact: archive.name.to_string(),
    message,
  };

  if archive.dir.exists() {
    info!(source = archive.name, path = %archive.dir.display(), "already extracted, skipping");
    remove_tarball(&archive.tarball)?;
    return Ok(false);
  }

  if archive.tarball.exists() {
    info!(path = %archive.tarball.display(), "tarball already present, not downloading");
  } else {
    fetcher
      .download(&archive.url, &archive.tarball)
      .await
      .map_err(|e| failed(e.to_string()))?;
  }

  create_dir(&archive.dir)?;

  info!(path = %archive.tarball.display(), "unpacking");
  let extract = CommandSpec::new("tar").args([
    "-xf".to_string(),
    archive.tarball.display().to_string(),
    "-C".to_string(),
    archive.dir.display().to_string(),
    "--strip-components".to_string(),
    "1".to_string(),
  ]);

  let outcome = runner.run(&extract).await;
  let message = match outcome {
    Ok(output) if output.success() => None,
    Ok(output) => Some(format!("tar failed ({}): {}", describe_exit(output.code), output.tail(OUTPUT_TAIL_LINES))),
    Err(e) => Some(e.to_string()),
  };

  if let Some(message) = message {
    // Leave the tarball for the next attempt, but not a half-filled tree
    // that would make it look extracted.
    if let Err(e) = std::fs::remove_dir_all(&archive.dir) {
      warn!(path = %archive.dir.display(), error = %e, "failed to remove partial extraction");
    }
    return Err(failed(message));
  }

  remove_tarball(&archive.tarball)?;
  Ok(true)
}

/// Clone mingw-w64 into `dest` unless it is already there.
///
/// Returns `true` if a clone happened.
pub async fn clone_mingw<R: CommandRunner>(runner: &R, dest: &Path) -> Result<bool> {
  if dest.exists() {
    info!(path = %dest.display(), "mingw-w64 already cloned, skipping");
    return Ok(false);
  }

  info!(url = MINGW_W64_REPO, "cloning mingw-w64");
  let clone = CommandSpec::new("git").args([
    "clone".to_string(),
    MINGW_W64_REPO.to_string(),
    dest.display().to_string(),
  ]);
  let output = runner.run(&clone).await.map_err(|e| Error::SourceAcquisitionFailed {
    artifact: "mingw-w64".to_string(),
    message: e.to_string(),
  })?;

  if !output.success() {
    return Err(Error::SourceAcquisitionFailed {
      artifact: "mingw-w64".to_string(),
      message: format!("git clone failed ({}): {}", describe_exit(output.code), output.tail(OUTPUT_TAIL_LINES)),
    });
  }

  Ok(true)
}

fn remove_tarball(path: &Path) -> Result<()> {
  match std::fs::remove_file(path) {
    Ok(()) => Ok(()),
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
    Err(source) => Err(Error::CleanupFailed {
      path: path.to_path_buf(),
      source,
    }),
  }
}
