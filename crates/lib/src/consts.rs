/// Application name, used for default directory names.
pub const APP_NAME: &str = "crossforge";

/// Pinned GCC release built by the cross toolchain pipeline.
pub const GCC_VERSION: &str = "13.2.0";

/// Pinned binutils release built by the cross toolchain pipeline.
pub const BINUTILS_VERSION: &str = "2.41";

/// Canonical mingw-w64 repository, cloned for Windows targets.
pub const MINGW_W64_REPO: &str = "https://github.com/mingw-w64/mingw-w64";

/// Environment variable overriding the default toolchain root.
pub const ROOT_ENV: &str = "CROSSFORGE_ROOT";

/// Environment variable overriding the default source workspace.
pub const SOURCES_ENV: &str = "CROSSFORGE_SOURCES";

/// Release tarball URL for the pinned GCC version.
pub fn gcc_url() -> String {
  format!("https://ftp.gnu.org/gnu/gcc/gcc-{GCC_VERSION}/gcc-{GCC_VERSION}.tar.gz")
}

/// Release tarball URL for the pinned binutils version.
pub fn binutils_url() -> String {
  format!("https://ftp.gnu.org/gnu/binutils/binutils-{BINUTILS_VERSION}.tar.gz")
}
