use std::fmt;
use std::str::FromStr;

use crate::params::ParamsError;

/// Target CPU architectures a cross toolchain can be built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
  X86_64,
  I686,
  Arm,
  Aarch32,
  Aarch64,
}

impl Arch {
  /// Every architecture with an entry in the prefix table.
  pub const ALL: [Arch; 5] = [Arch::X86_64, Arch::I686, Arch::Arm, Arch::Aarch32, Arch::Aarch64];

  /// Detect the host CPU architecture, if it is one we know.
  pub fn current() -> Option<Self> {
    std::env::consts::ARCH.parse().ok()
  }

  /// Returns the lowercase string identifier for this architecture
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::X86_64 => "x86_64",
      Self::I686 => "i686",
      Self::Arm => "arm",
      Self::Aarch32 => "aarch32",
      Self::Aarch64 => "aarch64",
    }
  }

  /// The GNU CPU name used in target triples. `aarch32` is spelled `arm`.
  pub fn triple_cpu(&self) -> &'static str {
    match self {
      Self::X86_64 => "x86_64",
      Self::I686 => "i686",
      Self::Arm | Self::Aarch32 => "arm",
      Self::Aarch64 => "aarch64",
    }
  }

  /// Tool prefix for this architecture on `platform`, e.g. `x86_64-elf`.
  pub fn toolchain_prefix(&self, platform: &str) -> String {
    format!("{}-{}", self.triple_cpu(), platform)
  }
}

impl FromStr for Arch {
  type Err = ParamsError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .into_iter()
      .find(|arch| arch.as_str() == s)
      .ok_or_else(|| ParamsError::UnknownArchitecture(s.to_string()))
  }
}

impl fmt::Display for Arch {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}
