use anyhow::Result;

use crossforge_lib::HostContext;
use crossforge_lib::consts::{BINUTILS_VERSION, GCC_VERSION};
use crossforge_lib::platform::{Host, paths};

use crate::output::{OutputFormat, print_json, print_stat, print_warning};

pub fn cmd_info(output: OutputFormat) -> Result<()> {
  let platform = Host::current().map(|host| host.triple());
  let manager = match HostContext::detect() {
    Ok(ctx) => ctx.package_manager().ok().map(|handle| handle.name()),
    Err(_) => None,
  };
  let root = paths::toolchain_root();
  let sources = paths::sources_dir();

  if output.is_json() {
    let json_output = serde_json::json!({
      "platform": platform,
      "package_manager": manager,
      "gcc_version": GCC_VERSION,
      "binutils_version": BINUTILS_VERSION,
      "root": root,
      "sources": sources,
    });
    return print_json(&json_output);
  }

  println!("System:");
  match &platform {
    Some(triple) => print_stat("Platform", triple),
    None => println!("Could not detect platform."),
  }
  match manager {
    Some(name) => print_stat("Package manager", name),
    None => print_warning("No supported package manager found"),
  }
  println!();
  println!("Toolchain:");
  print_stat("GCC", GCC_VERSION);
  print_stat("binutils", BINUTILS_VERSION);
  print_stat("Root", &root.display().to_string());
  print_stat("Sources", &sources.display().to_string());

  Ok(())
}
