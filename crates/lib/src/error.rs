//! Error type shared by the bootstrap pipeline.

use std::path::PathBuf;

use thiserror::Error;

use crate::bootstrap::stage::{Stage, StepKind};
use crate::exec::{ExecError, describe_exit};
use crate::params::ParamsError;

/// Errors that abort a toolchain request. None of them are retried.
#[derive(Debug, Error)]
pub enum Error {
  /// The host OS cannot build toolchains.
  #[error("unsupported host system '{0}' (supported: linux, darwin)")]
  UnsupportedHost(String),

  /// None of apt, pacman or brew is available.
  #[error("couldn't detect a supported package manager (looked for apt, pacman, brew)")]
  NoPackageManagerFound,

  /// The native installer reported failure.
  #[error("{manager} failed to install '{package}' ({status})", status = exit_status(.code))]
  DependencyInstallFailed {
    package: String,
    manager: &'static str,
    code: Option<i32>,
  },

  /// Downloading, extracting or cloning a source tree failed.
  #[error("failed to acquire {artifact}: {message}")]
  SourceAcquisitionFailed { artifact: String, message: String },

  /// A configure, build or install step exited non-zero.
  #[error(
    "{stage} {step} step failed ({status}){detail}",
    status = exit_status(.code),
    detail = output_detail(.output)
  )]
  BuildStageFailed {
    stage: Stage,
    step: StepKind,
    code: Option<i32>,
    /// Last lines the failing tool printed.
    output: String,
  },

  /// Removing a build or source directory failed.
  #[error("failed to remove {path}: {source}")]
  CleanupFailed {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// Preparing a directory the pipeline needs failed.
  #[error("failed to create {path}: {source}")]
  CreateDir {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error(transparent)]
  Params(#[from] ParamsError),

  #[error(transparent)]
  Exec(#[from] ExecError),
}

pub type Result<T> = std::result::Result<T, Error>;

fn exit_status(code: &Option<i32>) -> String {
  describe_exit(*code)
}

fn output_detail(output: &str) -> String {
  if output.is_empty() {
    String::new()
  } else {
    format!(":\n{output}")
  }
}

/// `create_dir_all` that reports which directory failed.
pub(crate) fn create_dir(path: &std::path::Path) -> Result<()> {
  std::fs::create_dir_all(path).map_err(|source| Error::CreateDir {
    path: path.to_path_buf(),
    source,
  })
}
