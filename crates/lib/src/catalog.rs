//! Host packages each toolchain needs, per package manager.
//!
//! Order matters: packages are installed in list order.

use crate::params::ToolchainKind;
use crate::pkg::PackageManagerKind;

const GCC_APT: &[&str] = &[
  "build-essential",
  "bison",
  "flex",
  "libgmp-dev",
  "libmpc-dev",
  "libmpfr-dev",
  "texinfo",
  "libisl-dev",
];
const GCC_PACMAN: &[&str] = &["base-devel", "gmp", "libmpc", "mpfr"];
const GCC_BREW: &[&str] = &["coreutils", "bison", "flex", "gmp", "libmpc", "mpfr", "texinfo", "isl"];

const CLANG_APT: &[&str] = &["clang", "lld"];
const CLANG_PACMAN: &[&str] = &["clang", "lld"];
const CLANG_BREW: &[&str] = &["llvm"];

/// Packages required to build or provide `kind` with `manager`.
pub fn dependencies(kind: ToolchainKind, manager: PackageManagerKind) -> &'static [&'static str] {
  match (kind, manager) {
    (ToolchainKind::Gcc, PackageManagerKind::Apt) => GCC_APT,
    (ToolchainKind::Gcc, PackageManagerKind::Pacman) => GCC_PACMAN,
    (ToolchainKind::Gcc, PackageManagerKind::Brew) => GCC_BREW,
    (ToolchainKind::Clang, PackageManagerKind::Apt) => CLANG_APT,
    (ToolchainKind::Clang, PackageManagerKind::Pacman) => CLANG_PACMAN,
    (ToolchainKind::Clang, PackageManagerKind::Brew) => CLANG_BREW,
  }
}
