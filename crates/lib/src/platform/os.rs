use std::fmt;

/// Host operating systems crossforge knows about.
///
/// Only Linux and macOS can host a toolchain build; Windows is recognised so
/// the caller gets a clear "unsupported host" error instead of a detection
/// failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
  Linux,
  MacOs,
  Windows,
}

impl Os {
  /// Detect the current operating system at runtime
  pub fn current() -> Option<Self> {
    match std::env::consts::OS {
      "linux" => Some(Self::Linux),
      "macos" => Some(Self::MacOs),
      "windows" => Some(Self::Windows),
      _ => None,
    }
  }

  /// Returns the lowercase string identifier for this OS
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Linux => "linux",
      Self::MacOs => "darwin",
      Self::Windows => "windows",
    }
  }

  /// Whether a toolchain can be built on this host.
  pub fn is_supported_host(&self) -> bool {
    matches!(self, Self::Linux | Self::MacOs)
  }

  /// Compiler flag asking the host compiler to optimise for the build machine.
  ///
  /// Apple clang rejects `-march=native`, so macOS only tunes.
  pub fn native_tuning_flag(&self) -> &'static str {
    match self {
      Self::MacOs => "-mtune=native",
      Self::Linux | Self::Windows => "-march=native",
    }
  }
}

impl fmt::Display for Os {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}
