//! Host and target platform description.

pub mod arch;
pub mod os;
pub mod paths;

use arch::Arch;
use os::Os;

/// The machine crossforge is running on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Host {
  pub arch: Option<Arch>,
  pub os: Os,
}

impl Host {
  /// Detect the current host at runtime
  ///
  /// Returns `None` if the OS is not recognised at all
  pub fn current() -> Option<Self> {
    Some(Self {
      arch: Arch::current(),
      os: Os::current()?,
    })
  }

  /// Returns a short description such as `x86_64-linux`.
  pub fn triple(&self) -> String {
    match self.arch {
      Some(arch) => format!("{}-{}", arch, self.os),
      None => format!("{}-{}", std::env::consts::ARCH, self.os),
    }
  }
}
