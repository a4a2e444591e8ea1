//! crossforge-lib: cross-compilation toolchain bootstrapping
//!
//! This crate provides everything the `crossforge` binary drives:
//! - `BuildParameters`: a validated, immutable build request
//! - `HostContext`: host OS and the memoized package manager
//! - `Orchestrator`: dependency install, source acquisition, staged GCC builds
//! - `ensure_dependencies`: host packages alone, for callers that build nothing
//! - `CommandRunner` / `Fetcher`: the seams to processes and downloads

pub mod bootstrap;
pub mod catalog;
pub mod consts;
pub mod context;
pub mod error;
pub mod exec;
pub mod fetch;
pub mod params;
pub mod pkg;
pub mod platform;
pub mod util;

pub use bootstrap::{BootstrapReport, Orchestrator, ensure_dependencies, is_toolchain_built};
pub use context::HostContext;
pub use error::{Error, Result};
pub use params::{BuildParameters, ParamsError, ToolchainKind};
