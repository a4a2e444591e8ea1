//! Pipeline stages and the commands each one runs.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::exec::{CommandSpec, EnvMap};
use crate::params::BuildParameters;
use crate::platform::arch::Arch;

/// Where a GCC toolchain build stands.
///
/// Never persisted; a finished toolchain is recognised by its binaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
  Unbuilt,
  BinutilsBuilt,
  MingwHeadersInstalled,
  CompilerStage1Built,
  MingwRuntimeBuilt,
  LibgccBuilt,
  Complete,
}

/// One ordered unit of the GCC pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
  Binutils,
  MingwHeaders,
  GccStage1,
  MingwRuntime,
  Libgcc,
}

impl Stage {
  /// Stages to run, in order. The MinGW stages only apply to Windows targets.
  pub fn plan(mingw: bool) -> Vec<Stage> {
    if mingw {
      vec![
        Stage::Binutils,
        Stage::MingwHeaders,
        Stage::GccStage1,
        Stage::MingwRuntime,
        Stage::Libgcc,
      ]
    } else {
      vec![Stage::Binutils, Stage::GccStage1, Stage::Libgcc]
    }
  }

  pub fn name(&self) -> &'static str {
    match self {
      Stage::Binutils => "binutils",
      Stage::MingwHeaders => "mingw-w64 headers",
      Stage::GccStage1 => "gcc stage 1",
      Stage::MingwRuntime => "mingw-w64 runtime",
      Stage::Libgcc => "libgcc",
    }
  }

  /// State reached once this stage has finished.
  pub fn reached_state(&self) -> PipelineState {
    match self {
      Stage::Binutils => PipelineState::BinutilsBuilt,
      Stage::MingwHeaders => PipelineState::MingwHeadersInstalled,
      Stage::GccStage1 => PipelineState::CompilerStage1Built,
      Stage::MingwRuntime => PipelineState::MingwRuntimeBuilt,
      Stage::Libgcc => PipelineState::LibgccBuilt,
    }
  }

  /// Working directory for this stage. libgcc is built from the GCC tree.
  pub fn build_dir(&self, params: &BuildParameters) -> PathBuf {
    let arch = params.arch();
    let name = match self {
      Stage::Binutils => format!("binutils-{arch}-build"),
      Stage::MingwHeaders => format!("mingw-headers-{arch}-build"),
      Stage::GccStage1 | Stage::Libgcc => format!("gcc-{arch}-build"),
      Stage::MingwRuntime => format!("mingw-crt-{arch}-build"),
    };
    params.root_dir().join(name)
  }
}

impl fmt::Display for Stage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.name())
  }
}

/// The phase of a stage a command belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
  Configure,
  Build,
  Install,
}

impl fmt::Display for StepKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      StepKind::Configure => "configure",
      StepKind::Build => "build",
      StepKind::Install => "install",
    };
    write!(f, "{}", s)
  }
}

/// A single command within a stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
  pub kind: StepKind,
  pub cmd: CommandSpec,
}

/// Everything needed to turn stages into commands.
pub struct StagePlanner<'a> {
  pub params: &'a BuildParameters,
  pub env: &'a EnvMap,
  pub jobs: usize,
  /// Extra GCC configure flags, e.g. Homebrew library prefixes on macOS.
  pub gcc_extra_args: &'a [String],
}

impl StagePlanner<'_> {
  /// Commands for `stage`, in execution order.
  pub fn steps(&self, stage: Stage) -> Vec<Step> {
    let params = self.params;
    let prefix = params.prefix();
    let root = params.root_dir().display().to_string();
    let sysroot = params.sysroot_dir().display().to_string();
    let jobs = format!("-j{}", self.jobs);

    match stage {
      Stage::Binutils => vec![
        self.step(
          stage,
          StepKind::Configure,
          CommandSpec::new(configure_script(params.binutils_sources_dir())).args([
            format!("--target={prefix}"),
            format!("--prefix={root}"),
            "--with-sysroot".to_string(),
            "--disable-nls".to_string(),
            "--disable-multilib".to_string(),
            "--disable-werror".to_string(),
          ]),
        ),
        self.step(stage, StepKind::Build, CommandSpec::new("make").arg(jobs)),
        self.step(stage, StepKind::Install, CommandSpec::new("make").arg("install")),
      ],
      Stage::MingwHeaders => vec![
        self.step(
          stage,
          StepKind::Configure,
          CommandSpec::new(configure_script(params.mingw_sources_dir().join("mingw-w64-headers")))
            .arg(format!("--prefix={sysroot}")),
        ),
        self.step(stage, StepKind::Install, CommandSpec::new("make").arg("install")),
      ],
      Stage::GccStage1 => vec![
        self.step(
          stage,
          StepKind::Configure,
          CommandSpec::new(configure_script(params.gcc_sources_dir()))
            .args([
              format!("--target={prefix}"),
              format!("--prefix={root}"),
              "--disable-nls".to_string(),
              "--enable-languages=c,c++".to_string(),
              "--disable-multilib".to_string(),
            ])
            .args(self.gcc_extra_args.iter().cloned()),
        ),
        self.step(stage, StepKind::Build, CommandSpec::new("make").args(["all-gcc".to_string(), jobs])),
        self.step(stage, StepKind::Install, CommandSpec::new("make").arg("install-gcc")),
      ],
      Stage::MingwRuntime => {
        let (enable, disable) = if params.arch() == Arch::I686 {
          ("--enable-lib32", "--disable-lib64")
        } else {
          ("--enable-lib64", "--disable-lib32")
        };
        vec![
          self.step(
            stage,
            StepKind::Configure,
            CommandSpec::new(configure_script(params.mingw_sources_dir().join("mingw-w64-crt"))).args([
              format!("--prefix={sysroot}"),
              format!("--host={prefix}"),
              format!("--with-sysroot={sysroot}"),
              enable.to_string(),
              disable.to_string(),
            ]),
          ),
          self.step(stage, StepKind::Build, CommandSpec::new("make").arg(jobs)),
          self.step(stage, StepKind::Install, CommandSpec::new("make").arg("install")),
        ]
      }
      Stage::Libgcc => vec![
        self.step(
          stage,
          StepKind::Build,
          CommandSpec::new("make").args(["all-target-libgcc".to_string(), jobs]),
        ),
        self.step(stage, StepKind::Install, CommandSpec::new("make").arg("install-target-libgcc")),
      ],
    }
  }

  fn step(&self, stage: Stage, kind: StepKind, cmd: CommandSpec) -> Step {
    Step {
      kind,
      cmd: cmd.cwd(stage.build_dir(self.params)).env(self.env),
    }
  }
}

fn configure_script(source_dir: PathBuf) -> String {
  source_dir.join("configure").display().to_string()
}
