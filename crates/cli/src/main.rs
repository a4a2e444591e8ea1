mod cmd;
mod output;

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cmd::{BuildArgs, cmd_build, cmd_deps, cmd_info, cmd_status};
use crossforge_lib::ToolchainKind;
use output::{OutputFormat, print_error};

/// crossforge - Cross-compilation toolchain bootstrapper
#[derive(Parser)]
#[command(name = "crossforge")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Output format
  #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
  output: OutputFormat,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Build (or install) a cross toolchain for a target architecture
  Build(BuildArgs),

  /// Install the host packages a toolchain needs, without building
  Deps {
    /// Toolchain whose dependencies to install (gcc or clang)
    #[arg(long, default_value = "clang", value_parser = parse_toolchain)]
    toolchain: ToolchainKind,
  },

  /// Show whether a GCC cross toolchain is already built
  Status {
    /// Target architecture (x86_64, i686, arm, aarch32, aarch64)
    arch: String,

    /// Target platform, e.g. elf or w64-mingw32
    #[arg(long, default_value = "elf")]
    platform: String,

    /// Toolchain root (defaults to $CROSSFORGE_ROOT or the data directory)
    #[arg(long)]
    root: Option<std::path::PathBuf>,
  },

  /// Show host information
  Info,
}

pub(crate) fn parse_toolchain(s: &str) -> Result<ToolchainKind, crossforge_lib::ParamsError> {
  s.parse()
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "info" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  match run(cli) {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      print_error(&format!("{:#}", e));
      ExitCode::FAILURE
    }
  }
}

fn run(cli: Cli) -> Result<()> {
  match cli.command {
    Commands::Build(args) => cmd_build(args, cli.verbose, cli.output),
    Commands::Deps { toolchain } => cmd_deps(toolchain, cli.verbose, cli.output),
    Commands::Status { arch, platform, root } => cmd_status(&arch, &platform, root, cli.output),
    Commands::Info => cmd_info(cli.output),
  }
}
