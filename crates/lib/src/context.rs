//! Process-wide host state.
//!
//! A [`HostContext`] is created once at startup and passed by reference to
//! every operation. It owns the package manager detection result so that
//! detection runs at most once per process, and with it the one-time index
//! refresh flag.

use std::fmt;
use std::sync::OnceLock;

use tracing::info;

use crate::error::{Error, Result};
use crate::pkg::{self, PackageManagerHandle, PackageManagerKind};
use crate::platform::os::Os;

/// Host facts shared by every operation in this process.
pub struct HostContext {
  os: Os,
  probe: fn(&str) -> bool,
  package_manager: OnceLock<PackageManagerHandle>,
}

impl HostContext {
  /// Detect the host OS and reject hosts that cannot build toolchains.
  pub fn detect() -> Result<Self> {
    let os = Os::current().ok_or_else(|| Error::UnsupportedHost(std::env::consts::OS.to_string()))?;
    if !os.is_supported_host() {
      return Err(Error::UnsupportedHost(os.to_string()));
    }
    Ok(Self::new(os))
  }

  /// Context for `os`, probing `PATH` for package managers on first use.
  pub fn new(os: Os) -> Self {
    Self::with_probe(os, pkg::on_path)
  }

  /// Context with a custom executable probe.
  pub fn with_probe(os: Os, probe: fn(&str) -> bool) -> Self {
    Self {
      os,
      probe,
      package_manager: OnceLock::new(),
    }
  }

  /// Context whose package manager is already known; no probing happens.
  pub fn with_package_manager(os: Os, kind: PackageManagerKind) -> Self {
    Self {
      os,
      probe: |_| false,
      package_manager: OnceLock::from(PackageManagerHandle::new(kind)),
    }
  }

  pub fn os(&self) -> Os {
    self.os
  }

  /// The package manager for this process, detected on first call.
  ///
  /// Once detected the handle is reused for the life of the context, even if
  /// the host changes underneath.
  pub fn package_manager(&self) -> Result<&PackageManagerHandle> {
    if let Some(handle) = self.package_manager.get() {
      return Ok(handle);
    }

    let kind = pkg::detect(self.os, self.probe)?;
    info!(manager = %kind, "detected package manager");
    Ok(self.package_manager.get_or_init(|| PackageManagerHandle::new(kind)))
  }
}

impl fmt::Debug for HostContext {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("HostContext")
      .field("os", &self.os)
      .field("package_manager", &self.package_manager.get())
      .finish_non_exhaustive()
  }
}
