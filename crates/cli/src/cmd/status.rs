//! Status command implementation.
//!
//! Reports whether a GCC cross toolchain is present under the root, judged by
//! its compiler and linker binaries.

use std::path::PathBuf;

use anyhow::Result;

use crossforge_lib::platform::paths;
use crossforge_lib::{BuildParameters, ToolchainKind, is_toolchain_built};

use crate::output::{OutputFormat, print_info, print_json, print_stat, print_success};

pub fn cmd_status(arch: &str, platform: &str, root: Option<PathBuf>, output: OutputFormat) -> Result<()> {
  let root = root.unwrap_or_else(paths::toolchain_root);
  let params = BuildParameters::new(ToolchainKind::Gcc, arch, platform, root, paths::sources_dir())?;
  let built = is_toolchain_built(&params);

  if output.is_json() {
    let json_output = serde_json::json!({
      "prefix": params.prefix(),
      "built": built,
      "root": params.root_dir(),
      "compiler": params.compiler_path(),
      "linker": params.linker_path(),
    });
    return print_json(&json_output);
  }

  if built {
    print_success(&format!("{} toolchain is built", params.prefix()));
  } else {
    print_info(&format!(
      "{} toolchain is not built. Run 'crossforge build {} --toolchain gcc --platform {}' to build it.",
      params.prefix(),
      arch,
      platform
    ));
  }
  print_stat("Root", &params.root_dir().display().to_string());
  print_stat("Compiler", &params.compiler_path().display().to_string());
  print_stat("Linker", &params.linker_path().display().to_string());

  Ok(())
}
