//! Toolchain bootstrap orchestration.
//!
//! Drives one build request through the pipeline:
//! 1. Entry check: a toolchain whose compiler and linker already exist is done
//! 2. Host dependency installation
//! 3. Source acquisition (GCC, binutils, mingw-w64 for Windows targets)
//! 4. Sequential stage builds
//! 5. Cleanup of build and source directories, per flags
//!
//! There is no resume point inside the pipeline. If a run fails part way, the
//! next run starts again from dependency installation; extracted sources and
//! existing build directories are reused, but every stage is rebuilt.

pub mod env;
pub mod sources;
pub mod stage;

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{error, info};

use crate::catalog;
use crate::context::HostContext;
use crate::error::{Error, Result, create_dir};
use crate::exec::{CommandRunner, OUTPUT_TAIL_LINES, job_count};
use crate::fetch::Fetcher;
use crate::params::{BuildParameters, ToolchainKind};
use crate::pkg::{self, DependencyReport};
use crate::platform::os::Os;

use stage::{PipelineState, Stage, StagePlanner};

pub use stage::StepKind;

/// Homebrew packages whose prefixes GCC's configure needs on macOS.
const BREW_GCC_LIBRARIES: &[(&str, &str)] = &[("--with-gmp", "gmp"), ("--with-mpc", "libmpc"), ("--with-mpfr", "mpfr")];

/// Outcome of a successful request.
#[derive(Debug, Clone, Serialize)]
pub struct BootstrapReport {
  pub kind: ToolchainKind,
  /// Tool prefix, for GCC requests.
  pub prefix: Option<String>,
  pub state: PipelineState,
  /// The completion marker was already present; nothing ran.
  pub already_built: bool,
  pub dependencies: Option<DependencyReport>,
  pub stages: Vec<Stage>,
  pub removed: Vec<PathBuf>,
}

/// Whether the compiler and linker for `params` are already installed.
pub fn is_toolchain_built(params: &BuildParameters) -> bool {
  params.compiler_path().is_file() && params.linker_path().is_file()
}

/// Install the host packages `kind` needs, in catalog order.
///
/// Only talks to the package manager, so it needs no download client.
pub async fn ensure_dependencies<R: CommandRunner>(
  ctx: &HostContext,
  runner: &R,
  kind: ToolchainKind,
) -> Result<DependencyReport> {
  let handle = ctx.package_manager()?;
  let packages = catalog::dependencies(kind, handle.kind());
  info!(toolchain = %kind, manager = handle.name(), count = packages.len(), "checking dependencies");
  pkg::install_dependencies(handle, runner, packages).await
}

/// Runs build requests against one host.
pub struct Orchestrator<'a, R, F> {
  ctx: &'a HostContext,
  runner: &'a R,
  fetcher: &'a F,
}

impl<'a, R: CommandRunner, F: Fetcher> Orchestrator<'a, R, F> {
  pub fn new(ctx: &'a HostContext, runner: &'a R, fetcher: &'a F) -> Self {
    Self { ctx, runner, fetcher }
  }

  /// Provide the toolchain described by `params`.
  pub async fn build_toolchain(&self, params: BuildParameters) -> Result<BootstrapReport> {
    let os = self.ctx.os();
    if !os.is_supported_host() {
      return Err(Error::UnsupportedHost(os.to_string()));
    }

    match params.kind() {
      ToolchainKind::Gcc => self.ensure_gcc_toolchain(&params).await,
      ToolchainKind::Clang => self.ensure_clang_toolchain(&params).await,
    }
  }

  pub async fn ensure_dependencies(&self, kind: ToolchainKind) -> Result<DependencyReport> {
    ensure_dependencies(self.ctx, self.runner, kind).await
  }

  async fn resolve_dependencies(&self, params: &BuildParameters) -> Result<Option<DependencyReport>> {
    if params.skips_dependencies() {
      info!("skipping dependency installation");
      return Ok(None);
    }
    self.ensure_dependencies(params.kind()).await.map(Some)
  }

  async fn ensure_clang_toolchain(&self, params: &BuildParameters) -> Result<BootstrapReport> {
    let dependencies = self.resolve_dependencies(params).await?;

    Ok(BootstrapReport {
      kind: params.kind(),
      prefix: None,
      state: PipelineState::Complete,
      already_built: false,
      dependencies,
      stages: Vec::new(),
      removed: Vec::new(),
    })
  }

  async fn ensure_gcc_toolchain(&self, params: &BuildParameters) -> Result<BootstrapReport> {
    let prefix = params.prefix();

    if is_toolchain_built(params) {
      info!(arch = %params.arch(), prefix = %prefix, "toolchain is already built");
      return Ok(BootstrapReport {
        kind: params.kind(),
        prefix: Some(prefix),
        state: PipelineState::Complete,
        already_built: true,
        dependencies: None,
        stages: Vec::new(),
        removed: Vec::new(),
      });
    }

    create_dir(params.root_dir())?;

    let dependencies = self.resolve_dependencies(params).await?;

    self.acquire_sources(params).await?;

    info!(arch = %params.arch(), prefix = %prefix, "building the GCC toolchain");

    if params.is_mingw() {
      create_dir(&params.sysroot_dir())?;
    }

    let env = env::build_environment(env::ambient(), self.ctx.os(), params.wants_native_tuning(), &params.bin_dir());
    let gcc_extra_args = self.gcc_host_library_args().await?;
    let planner = StagePlanner {
      params,
      env: &env,
      jobs: job_count(),
      gcc_extra_args: &gcc_extra_args,
    };

    let plan = Stage::plan(params.is_mingw());
    let mut state = PipelineState::Unbuilt;
    for stage in &plan {
      self.run_stage(&planner, *stage).await?;
      state = stage.reached_state();
    }

    info!(arch = %params.arch(), state = ?state, "toolchain built successfully");

    let removed = cleanup(params, &plan)?;

    Ok(BootstrapReport {
      kind: params.kind(),
      prefix: Some(prefix),
      state: PipelineState::Complete,
      already_built: false,
      dependencies,
      stages: plan,
      removed,
    })
  }

  async fn acquire_sources(&self, params: &BuildParameters) -> Result<()> {
    create_dir(params.sources_dir())?;

    for archive in sources::gcc_archives(params) {
      sources::acquire_archive(self.runner, self.fetcher, &archive).await?;
    }

    if params.is_mingw() {
      sources::clone_mingw(self.runner, &params.mingw_sources_dir()).await?;
    }

    Ok(())
  }

  /// Extra GCC configure flags pointing at Homebrew's math libraries.
  async fn gcc_host_library_args(&self) -> Result<Vec<String>> {
    if self.ctx.os() != Os::MacOs {
      return Ok(Vec::new());
    }

    let handle = self.ctx.package_manager()?;
    let mut args = Vec::new();
    for (flag, package) in BREW_GCC_LIBRARIES {
      if let Some(prefix) = handle.prefix(self.runner, package).await? {
        args.push(format!("{}={}", flag, prefix.display()));
      }
    }
    Ok(args)
  }

  async fn run_stage(&self, planner: &StagePlanner<'_>, stage: Stage) -> Result<()> {
    let build_dir = stage.build_dir(planner.params);
    create_dir(&build_dir)?;

    info!(stage = %stage, dir = %build_dir.display(), "building");

    for step in planner.steps(stage) {
      let output = self.runner.run(&step.cmd).await?;
      if !output.success() {
        let tail = output.tail(OUTPUT_TAIL_LINES);
        error!(stage = %stage, step = %step.kind, code = ?output.code, cmd = %step.cmd, output = %tail, "stage failed");
        return Err(Error::BuildStageFailed {
          stage,
          step: step.kind,
          code: output.code,
          output: tail,
        });
      }
    }

    Ok(())
  }
}

/// Remove build and source directories the flags don't ask to keep.
fn cleanup(params: &BuildParameters, plan: &[Stage]) -> Result<Vec<PathBuf>> {
  let mut targets: Vec<PathBuf> = Vec::new();

  if !params.keeps_build() {
    info!("removing build directories");
    for stage in plan {
      let dir = stage.build_dir(params);
      if !targets.contains(&dir) {
        targets.push(dir);
      }
    }
  }

  if !params.keeps_sources() {
    info!("removing source directories");
    targets.push(params.gcc_sources_dir());
    targets.push(params.binutils_sources_dir());
    if params.is_mingw() {
      targets.push(params.mingw_sources_dir());
    }
  }

  let mut removed = Vec::new();
  for dir in targets {
    if remove_tree(&dir)? {
      removed.push(dir);
    }
  }
  Ok(removed)
}

fn remove_tree(path: &Path) -> Result<bool> {
  if !path.exists() {
    return Ok(false);
  }
  std::fs::remove_dir_all(path).map_err(|source| Error::CleanupFailed {
    path: path.to_path_buf(),
    source,
  })?;
  Ok(true)
}
