//! Implementation of the `crossforge deps` command.

use anyhow::{Context, Result};

use crossforge_lib::exec::HostRunner;
use crossforge_lib::{HostContext, ToolchainKind, ensure_dependencies};

use crate::output::{OutputFormat, print_json, print_stat, print_success, symbols};

pub fn cmd_deps(toolchain: ToolchainKind, verbose: bool, output: OutputFormat) -> Result<()> {
  let ctx = HostContext::detect()?;
  let runner = HostRunner::new().streaming(verbose && !output.is_json());

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let report = rt
    .block_on(ensure_dependencies(&ctx, &runner, toolchain))
    .context("Dependency installation failed")?;

  if output.is_json() {
    return print_json(&report);
  }

  print_success(&format!("{} dependencies are installed", toolchain));
  if let Some(manager) = report.manager {
    print_stat("Package manager", manager.name());
  }
  for package in &report.installed {
    println!("  {} {} (installed)", symbols::ARROW, package);
  }
  if verbose {
    for package in &report.already_present {
      println!("  {} {}", symbols::INFO, package);
    }
  }

  Ok(())
}
