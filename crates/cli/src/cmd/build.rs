//! Implementation of the `crossforge build` command.
//!
//! Resolves host dependencies and, for GCC, fetches sources and runs the
//! staged cross build under the toolchain root.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use tracing::debug;

use crossforge_lib::exec::HostRunner;
use crossforge_lib::fetch::HttpFetcher;
use crossforge_lib::platform::paths;
use crossforge_lib::{BootstrapReport, BuildParameters, HostContext, Orchestrator, ToolchainKind};

use crate::output::{OutputFormat, format_duration, print_info, print_json, print_stat, print_success, symbols};

#[derive(Debug, Args)]
pub struct BuildArgs {
  /// Target architecture (x86_64, i686, arm, aarch32, aarch64)
  pub arch: String,

  /// Toolchain to provide (gcc or clang)
  #[arg(long, default_value = "clang", value_parser = crate::parse_toolchain)]
  pub toolchain: ToolchainKind,

  /// Target platform, e.g. elf, none-eabi or w64-mingw32
  #[arg(long, default_value = "elf")]
  pub platform: String,

  /// Toolchain root (defaults to $CROSSFORGE_ROOT or the data directory)
  #[arg(long)]
  pub root: Option<PathBuf>,

  /// Source workspace (defaults to $CROSSFORGE_SOURCES or the cache directory)
  #[arg(long)]
  pub sources: Option<PathBuf>,

  /// Don't install host packages
  #[arg(long)]
  pub skip_toolchain_dependencies: bool,

  /// Keep downloaded and extracted sources after a successful build
  #[arg(long)]
  pub keep_toolchain_sources: bool,

  /// Keep per-stage build directories after a successful build
  #[arg(long)]
  pub keep_toolchain_build: bool,

  /// Don't add host CPU tuning flags to CFLAGS/CXXFLAGS
  #[arg(long)]
  pub no_tune_native: bool,
}

impl BuildArgs {
  fn into_params(self) -> Result<BuildParameters> {
    let root = self.root.unwrap_or_else(paths::toolchain_root);
    let sources = self.sources.unwrap_or_else(paths::sources_dir);

    let params = BuildParameters::new(self.toolchain, &self.arch, self.platform, root, sources)?
      .tune_for_native(!self.no_tune_native)
      .skip_dependencies(self.skip_toolchain_dependencies)
      .keep_sources(self.keep_toolchain_sources)
      .keep_build(self.keep_toolchain_build);
    Ok(params)
  }
}

/// Execute the build command.
pub fn cmd_build(args: BuildArgs, verbose: bool, output: OutputFormat) -> Result<()> {
  let params = args.into_params()?;
  debug!(?params, "build request");
  let ctx = HostContext::detect()?;
  let runner = HostRunner::new().streaming(verbose && !output.is_json());
  let fetcher = HttpFetcher::new();
  let root = params.root_dir().to_path_buf();

  let started = Instant::now();
  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let report = rt
    .block_on(Orchestrator::new(&ctx, &runner, &fetcher).build_toolchain(params))
    .context("Toolchain build failed")?;

  if output.is_json() {
    return print_json(&report);
  }

  print_report(&report, &root, started.elapsed());
  Ok(())
}

fn print_report(report: &BootstrapReport, root: &std::path::Path, elapsed: std::time::Duration) {
  if report.already_built {
    print_info(&format!(
      "{} toolchain already built in {}",
      report.prefix.as_deref().unwrap_or_default(),
      root.display()
    ));
    return;
  }

  match report.kind {
    ToolchainKind::Gcc => {
      print_success(&format!(
        "Built {} toolchain in {}",
        report.prefix.as_deref().unwrap_or_default(),
        format_duration(elapsed)
      ));
      for stage in &report.stages {
        println!("  {} {}", symbols::ARROW, stage);
      }
      print_stat("Root", &root.display().to_string());
    }
    ToolchainKind::Clang => print_success("Clang toolchain dependencies are installed"),
  }

  if let Some(deps) = &report.dependencies {
    print_stat("Packages installed", &deps.installed.len().to_string());
    print_stat("Already present", &deps.already_present.len().to_string());
  }
  if !report.removed.is_empty() {
    print_stat("Directories removed", &report.removed.len().to_string());
  }
}
