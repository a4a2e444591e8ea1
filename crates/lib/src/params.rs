//! Build request description.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::platform::arch::Arch;

/// Errors raised while constructing [`BuildParameters`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParamsError {
  #[error("unknown target architecture '{0}' (expected one of: x86_64, i686, arm, aarch32, aarch64)")]
  UnknownArchitecture(String),

  #[error("unknown toolchain '{0}' (expected gcc or clang)")]
  UnknownToolchain(String),

  #[error("a target platform is required to build a {0} cross toolchain")]
  MissingTargetPlatform(ToolchainKind),
}

/// Which toolchain to provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolchainKind {
  /// binutils + GCC cross compiler built from source.
  Gcc,
  /// Host clang/lld, installed through the package manager only.
  Clang,
}

impl ToolchainKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Gcc => "gcc",
      Self::Clang => "clang",
    }
  }
}

impl FromStr for ToolchainKind {
  type Err = ParamsError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "gcc" => Ok(Self::Gcc),
      "clang" => Ok(Self::Clang),
      other => Err(ParamsError::UnknownToolchain(other.to_string())),
    }
  }
}

impl fmt::Display for ToolchainKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// One toolchain build request.
///
/// Constructed once from caller input and not mutated once handed to the
/// orchestrator. The architecture is validated here, so an unknown
/// architecture never reaches the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildParameters {
  kind: ToolchainKind,
  arch: Arch,
  platform: String,
  root_dir: PathBuf,
  sources_dir: PathBuf,
  tune_for_native: bool,
  skip_dependencies: bool,
  keep_sources: bool,
  keep_build: bool,
}

impl BuildParameters {
  /// Validate and create a build request with default flags: tuning on,
  /// dependency install on, sources and build directories removed afterwards.
  pub fn new(
    kind: ToolchainKind,
    arch: &str,
    platform: impl Into<String>,
    root_dir: impl Into<PathBuf>,
    sources_dir: impl Into<PathBuf>,
  ) -> Result<Self, ParamsError> {
    let arch: Arch = arch.parse()?;
    let platform = platform.into();

    if kind == ToolchainKind::Gcc && platform.trim().is_empty() {
      return Err(ParamsError::MissingTargetPlatform(kind));
    }

    Ok(Self {
      kind,
      arch,
      platform,
      root_dir: root_dir.into(),
      sources_dir: sources_dir.into(),
      tune_for_native: true,
      skip_dependencies: false,
      keep_sources: false,
      keep_build: false,
    })
  }

  pub fn tune_for_native(mut self, enabled: bool) -> Self {
    self.tune_for_native = enabled;
    self
  }

  pub fn skip_dependencies(mut self, skip: bool) -> Self {
    self.skip_dependencies = skip;
    self
  }

  pub fn keep_sources(mut self, keep: bool) -> Self {
    self.keep_sources = keep;
    self
  }

  pub fn keep_build(mut self, keep: bool) -> Self {
    self.keep_build = keep;
    self
  }

  pub fn kind(&self) -> ToolchainKind {
    self.kind
  }

  pub fn arch(&self) -> Arch {
    self.arch
  }

  pub fn platform(&self) -> &str {
    &self.platform
  }

  pub fn root_dir(&self) -> &Path {
    &self.root_dir
  }

  pub fn sources_dir(&self) -> &Path {
    &self.sources_dir
  }

  pub fn wants_native_tuning(&self) -> bool {
    self.tune_for_native
  }

  pub fn skips_dependencies(&self) -> bool {
    self.skip_dependencies
  }

  pub fn keeps_sources(&self) -> bool {
    self.keep_sources
  }

  pub fn keeps_build(&self) -> bool {
    self.keep_build
  }

  /// Tool prefix, e.g. `x86_64-elf` or `x86_64-w64-mingw32`.
  pub fn prefix(&self) -> String {
    self.arch.toolchain_prefix(&self.platform)
  }

  /// Whether the target is Windows, which adds the mingw-w64 stages.
  pub fn is_mingw(&self) -> bool {
    self.platform.contains("mingw")
  }

  pub fn bin_dir(&self) -> PathBuf {
    self.root_dir.join("bin")
  }

  /// `<root>/bin/<prefix>-gcc`, one half of the completion marker.
  pub fn compiler_path(&self) -> PathBuf {
    self.bin_dir().join(format!("{}-gcc", self.prefix()))
  }

  /// `<root>/bin/<prefix>-ld`, the other half of the completion marker.
  pub fn linker_path(&self) -> PathBuf {
    self.bin_dir().join(format!("{}-ld", self.prefix()))
  }

  /// `<root>/<prefix>`, the MinGW sysroot.
  pub fn sysroot_dir(&self) -> PathBuf {
    self.root_dir.join(self.prefix())
  }

  pub fn gcc_sources_dir(&self) -> PathBuf {
    self.sources_dir.join("gcc_sources")
  }

  pub fn binutils_sources_dir(&self) -> PathBuf {
    self.sources_dir.join("binutils_sources")
  }

  pub fn mingw_sources_dir(&self) -> PathBuf {
    self.sources_dir.join("mingw-w64")
  }
}
