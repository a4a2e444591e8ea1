use std::path::PathBuf;

use crate::consts::{APP_NAME, ROOT_ENV, SOURCES_ENV};

/// Returns the user's home directory, or the working directory when `HOME` is unset.
pub fn home_dir() -> PathBuf {
  std::env::var("HOME").map(PathBuf::from).unwrap_or_else(|_| PathBuf::from("."))
}

/// Returns the directory for data files for the application
pub fn data_dir() -> PathBuf {
  let data_home = std::env::var("XDG_DATA_HOME")
    .map(PathBuf::from)
    .unwrap_or_else(|_| home_dir().join(".local").join("share"));
  data_home.join(APP_NAME)
}

/// Returns the directory for cache files for the application
pub fn cache_dir() -> PathBuf {
  let cache_home = std::env::var("XDG_CACHE_HOME")
    .map(PathBuf::from)
    .unwrap_or_else(|_| home_dir().join(".cache"));
  cache_home.join(APP_NAME)
}

/// Default output root for built toolchains.
///
/// `CROSSFORGE_ROOT` wins over the XDG data directory.
pub fn toolchain_root() -> PathBuf {
  if let Ok(path) = std::env::var(ROOT_ENV) {
    return PathBuf::from(path);
  }
  data_dir().join("toolchains")
}

/// Default workspace for downloaded and cloned sources.
///
/// `CROSSFORGE_SOURCES` wins over the XDG cache directory.
pub fn sources_dir() -> PathBuf {
  if let Ok(path) = std::env::var(SOURCES_ENV) {
    return PathBuf::from(path);
  }
  cache_dir().join("sources")
}
